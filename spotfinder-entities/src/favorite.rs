use crate::{id::*, time::*, user::*};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Favorite {
    pub user: UserId,
    pub report_id: Id,
    pub created_at: Timestamp,
}
