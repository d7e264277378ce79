//! Auth record DTOs shared by the login flow, the store, and persistence.
//!
//! DESIGN
//! ======
//! Field names mirror the backend's camelCase JSON so the persisted
//! `auth-storage` entry and login responses decode without adapters.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Summary of the signed-in user, produced by login.
///
/// Missing fields decode to their defaults, so a stored record written with
/// gaps still restores.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserData {
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub id: i64,
    pub email: String,
    pub name: String,
    pub phone_number: String,
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub role_id: i64,
    pub role_name: String,
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub company_id: i64,
    pub company_name: String,
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub employee_id: i64,
}

/// Partial update for [`UserData`]. `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDataPatch {
    pub id: Option<i64>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub role_id: Option<i64>,
    pub role_name: Option<String>,
    pub company_id: Option<i64>,
    pub company_name: Option<String>,
    pub employee_id: Option<i64>,
}

impl UserDataPatch {
    /// True when the patch names no fields.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Shallow-merge the set fields over `target`.
    pub fn apply_to(self, target: &mut UserData) {
        if let Some(id) = self.id {
            target.id = id;
        }
        if let Some(email) = self.email {
            target.email = email;
        }
        if let Some(name) = self.name {
            target.name = name;
        }
        if let Some(phone_number) = self.phone_number {
            target.phone_number = phone_number;
        }
        if let Some(role_id) = self.role_id {
            target.role_id = role_id;
        }
        if let Some(role_name) = self.role_name {
            target.role_name = role_name;
        }
        if let Some(company_id) = self.company_id {
            target.company_id = company_id;
        }
        if let Some(company_name) = self.company_name {
            target.company_name = company_name;
        }
        if let Some(employee_id) = self.employee_id {
            target.employee_id = employee_id;
        }
    }
}

/// Full profile of the signed-in user, including the permission tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailsData {
    pub first_name: String,
    pub last_name: String,
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub role_id: i64,
    pub role_name: String,
    pub email: String,
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub employee_id: i64,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    pub company_details: CompanyDetails,
}

impl UserDetailsData {
    /// Look up the leaf permission id at `module / submodule / element / permission`.
    ///
    /// Names match exactly. Returns `None` when any segment is missing.
    pub fn permission_id(&self, module: &str, submodule: &str, element: &str, permission: &str) -> Option<i64> {
        self.permissions
            .iter()
            .filter(|m| m.name == module)
            .flat_map(|m| m.submodule.iter())
            .filter(|s| s.name == submodule)
            .flat_map(|s| s.elements.iter())
            .filter(|e| e.name == element)
            .flat_map(|e| e.permissions.iter())
            .find(|p| p.name == permission)
            .map(|p| p.id)
    }

    /// Whether the permission path exists in this profile.
    pub fn has_permission(&self, module: &str, submodule: &str, element: &str, permission: &str) -> bool {
        self.permission_id(module, submodule, element, permission)
            .is_some()
    }
}

/// Top level of the permission tree (an application module).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub name: String,
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub id: i64,
    #[serde(default)]
    pub submodule: Vec<Submodule>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submodule {
    pub name: String,
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub id: i64,
    #[serde(default)]
    pub elements: Vec<Element>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub id: i64,
    #[serde(default)]
    pub permissions: Vec<PermissionLeaf>,
}

/// A single named capability granted on an element.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionLeaf {
    pub name: String,
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub id: i64,
}

/// Contact details of the user's company.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetails {
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub company_id: i64,
    pub company_name: String,
    pub address: String,
    pub phone_number: String,
}

/// Basic employee record. The shape is owned by the HR service, so it is kept
/// as raw JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BasicEmployeeInfo(pub serde_json::Value);

impl BasicEmployeeInfo {
    /// Read a top-level field of the record.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }
}

impl From<serde_json::Value> for BasicEmployeeInfo {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

pub(crate) fn deserialize_i64_from_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Ok(int);
            }
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
            if let Some(float) = number.as_f64()
                && float.is_finite()
                && float.fract() == 0.0
                && float >= i64::MIN as f64
                && float < i64::MAX as f64
            {
                return Ok(float as i64);
            }
            Err(D::Error::custom("expected integer-compatible number"))
        }
        _ => Err(D::Error::custom("expected number")),
    }
}

/// Like [`deserialize_i64_from_number`], but also accepts numeric strings as
/// found in cookie payloads.
pub(crate) fn deserialize_i64_lenient<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("expected numeric string, got {raw:?}"))),
        other => deserialize_i64_from_number(other).map_err(D::Error::custom),
    }
}
