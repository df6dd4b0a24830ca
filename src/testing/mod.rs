//! Testing utilities for ceremony consumers
//!
//! Available to unit tests and, with the `testing` feature, to integration tests.
//!
//! - [`fixtures`] - Pre-built options and attestation statements
//! - [`mock`] - A deterministic in-memory authenticator
//!
//! ```ignore
//! use vouchrs_ceremony::testing::{StubAuthenticator, TestFixtures};
//! use vouchrs_ceremony::ClientPlatform;
//!
//! let mut client = ClientPlatform::new(TestFixtures::origin(), StubAuthenticator::new());
//! let credential = client
//!     .create_with_defaults(&TestFixtures::creation_options())
//!     .unwrap();
//! assert_eq!(credential.raw_id(), vouchrs_ceremony::testing::constants::TEST_CREDENTIAL_ID);
//! ```

pub mod fixtures;
pub mod mock;

pub use fixtures::TestFixtures;
pub use mock::{CallCounter, StubAuthenticator};

/// Common test constants
pub mod constants {
    /// Relying party identifier
    pub const TEST_RP_ID: &str = "example.com";

    /// Relying party display name
    pub const TEST_RP_NAME: &str = "Example RP";

    /// Origin matching [`TEST_RP_ID`]
    pub const TEST_ORIGIN: &str = "https://example.com";

    pub const TEST_CHALLENGE: &[u8] = b"test-challenge-0123456789abcdef";

    pub const TEST_USER_HANDLE: &[u8] = b"user-handle-42";
    pub const TEST_USER_NAME: &str = "test@example.com";
    pub const TEST_USER_DISPLAY_NAME: &str = "Test User";

    /// Credential id the stub authenticator issues unless configured otherwise
    pub const TEST_CREDENTIAL_ID: &[u8] = b"stub-credential-0001";

    /// Fixed signature the stub authenticator places in statements and assertions
    pub const TEST_SIGNATURE: &[u8] = b"stub-signature";

    /// Placeholder DER certificate
    pub const TEST_CERTIFICATE: &[u8] = &[0x30, 0x82, 0x01, 0x0a, 0x02, 0x01, 0x01];

    /// ES256
    pub const ALG_ES256: i64 = -7;

    /// RS256
    pub const ALG_RS256: i64 = -257;
}
