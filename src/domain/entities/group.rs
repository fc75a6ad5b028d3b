use crate::domain::values::user_id::UserId;
use serde::{Deserialize, Serialize};

/// A cohort of users matched together. Member order carries no meaning;
/// members are kept sorted so equal groups compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Group(Vec<UserId>);

impl Group {
    pub fn new(mut members: Vec<UserId>) -> Self {
        members.sort();
        Group(members)
    }

    pub fn members(&self) -> &[UserId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
