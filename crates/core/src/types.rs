/// Backend row identifiers (MySQL auto-increment).
pub type DbId = i64;

/// Identifier of the signed-in user that owns snapshots.
pub type UserId = DbId;
