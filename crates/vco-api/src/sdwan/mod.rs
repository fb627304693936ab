// REST v2 client modules
//
// The `/api/sdwan/v2/` surface keys edges by logical id and is used for
// edge creation; everything else goes through the portal.

pub mod client;
pub mod models;

pub use client::SdwanClient;
