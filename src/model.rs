//! Person and Address records plus the request payloads that create and change them.
//!
//! JSON uses PascalCase field names (`ID`, `PersonID`, `CreatedAt`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct Person {
    #[serde(rename = "ID")]
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub name: String,
    pub skills: String,
    pub email: String,
    /// Filled only when a single person is fetched.
    #[sqlx(skip)]
    #[serde(default)]
    pub addresses: Vec<Address>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct Address {
    #[serde(rename = "ID")]
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(rename = "PersonID")]
    pub person_id: i64,
    pub city: String,
    pub state: String,
    pub mobile: String,
}

/// POST /person body. Server-assigned fields in the body are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NewPerson {
    pub name: String,
    pub skills: String,
    pub email: String,
    pub addresses: Vec<NewPersonAddress>,
}

/// Address nested in a POST /person body; its owner is the person being created.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NewPersonAddress {
    pub city: String,
    pub state: String,
    pub mobile: String,
}

/// POST /address body.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NewAddress {
    #[serde(rename = "PersonID")]
    pub person_id: i64,
    pub city: String,
    pub state: String,
    pub mobile: String,
}

impl NewPersonAddress {
    pub fn owned_by(self, person_id: i64) -> NewAddress {
        NewAddress {
            person_id,
            city: self.city,
            state: self.state,
            mobile: self.mobile,
        }
    }
}

/// PUT /person/{id} body. Absent or null fields keep the stored value.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PersonChanges {
    pub name: Option<String>,
    pub skills: Option<String>,
    pub email: Option<String>,
}

/// PUT /address/{id} body. Absent or null fields keep the stored value.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AddressChanges {
    #[serde(rename = "PersonID")]
    pub person_id: Option<i64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub mobile: Option<String>,
}

impl PersonChanges {
    pub fn apply_to(&self, person: &mut Person) {
        if let Some(ref name) = self.name {
            person.name = name.clone();
        }
        if let Some(ref skills) = self.skills {
            person.skills = skills.clone();
        }
        if let Some(ref email) = self.email {
            person.email = email.clone();
        }
    }
}

impl AddressChanges {
    pub fn apply_to(&self, address: &mut Address) {
        if let Some(person_id) = self.person_id {
            address.person_id = person_id;
        }
        if let Some(ref city) = self.city {
            address.city = city.clone();
        }
        if let Some(ref state) = self.state {
            address.state = state.clone();
        }
        if let Some(ref mobile) = self.mobile {
            address.mobile = mobile.clone();
        }
    }
}

/// Path ids are numeric; anything else names no row.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}
