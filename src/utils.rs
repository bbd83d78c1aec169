//! Identifier helpers
//!
//! Ids are uuid7 values rendered through bech32 so every identifier is
//! self-describing (`guide_1...`, `tenant_1...`, `user_1...`).

use bech32::Bech32m;
use uuid7::uuid7;

pub const TENANT_HRP: &str = "tenant_";
pub const GUIDE_HRP: &str = "guide_";
pub const USER_HRP: &str = "user_";
pub(crate) const HISTORY_HRP: &str = "rev_";

// construct a unique id then encode using bech32
pub fn new_uuid_to_bech32(hrp: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encode = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encode)
}
