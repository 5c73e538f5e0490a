//! Document type tags and reserved document keys.

/// Key under which the logical document type is stamped.
pub const TYPE_KEY: &str = "type";
/// Reserved key holding the document identifier.
pub const ID_KEY: &str = "_id";
/// Reserved key holding the document revision.
pub const REV_KEY: &str = "_rev";

/// Document type tag for user profiles.
pub const PROFILE: &str = "profile";

/// Registry name of the profile model.
pub const PROFILE_MODEL: &str = "Profile";
