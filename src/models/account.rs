use serde::{Deserialize, Serialize};

use crate::filter::{FieldValue, Queryable};
use crate::store::Entity;

/// Byte-coded account role. The code is what external callers filter by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountRole {
    Admin,
    Staff,
    Lecturer,
}

impl AccountRole {
    pub fn code(self) -> u8 {
        match self {
            AccountRole::Admin => 1,
            AccountRole::Staff => 2,
            AccountRole::Lecturer => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(AccountRole::Admin),
            2 => Some(AccountRole::Staff),
            3 => Some(AccountRole::Lecturer),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccountRole::Admin => "Admin",
            AccountRole::Staff => "Staff",
            AccountRole::Lecturer => "Lecturer",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemAccount {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: AccountRole,
}

impl Queryable for SystemAccount {
    fn entity_id(&self) -> i32 {
        self.id
    }

    fn fields() -> &'static [&'static str] {
        &["id", "name", "email", "role"]
    }

    fn field(&self, name: &str) -> FieldValue {
        match name.to_ascii_lowercase().as_str() {
            "id" => FieldValue::Int(self.id),
            "name" => FieldValue::Text(self.name.clone()),
            "email" => FieldValue::Text(self.email.clone()),
            "role" => FieldValue::Int(self.role.code() as i32),
            _ => FieldValue::Null,
        }
    }
}

impl Entity for SystemAccount {
    fn assign_id(&mut self, id: i32) {
        self.id = id;
    }
}
