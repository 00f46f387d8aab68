/// Session key holding the external identity id of the signed-in user.
pub const USER_ID: &str = "user_id";
