pub mod claims;
pub mod issuer;
pub mod signer;
pub mod time;

pub use claims::{ClaimNaming, ClientTokenData, JsonObject, OrganizationDetails, Status, UserDetails};
pub use issuer::{application_management_token, client_token, server_token, TokenIssueError, TokenIssuer};
