//! Typed customer payload and its conversion into a template data model.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::template::DataModel;

/// Customer record accepted by `POST /api/transform/customer`.
///
/// Every field is optional. Absent fields are left out of the data model, so a
/// template that references one fails unless it supplies a `default`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub customer_id: Option<String>,
    pub personal_info: Option<PersonalInfo>,
    pub accounts: Option<Vec<AccountInfo>>,
    pub preferences: Option<ContactPreferences>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub account_number: Option<String>,
    pub account_type: Option<String>,
    pub balance: Option<f64>,
    pub currency: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPreferences {
    pub email_notifications: Option<bool>,
    pub sms_notifications: Option<bool>,
    pub preferred_language: Option<String>,
}

/// Explicit conversion of a record into the generic template tree
pub trait ToDataModel {
    fn to_data_model(&self) -> DataModel;
}

impl ToDataModel for CustomerInput {
    fn to_data_model(&self) -> DataModel {
        let mut model = DataModel::new();
        insert(&mut model, "customerId", string(&self.customer_id));
        insert(&mut model, "personalInfo", nested(self.personal_info.as_ref()));
        insert(
            &mut model,
            "accounts",
            self.accounts.as_ref().map(|accounts| {
                Value::Array(
                    accounts
                        .iter()
                        .map(|a| Value::Object(a.to_data_model()))
                        .collect(),
                )
            }),
        );
        insert(&mut model, "preferences", nested(self.preferences.as_ref()));
        model
    }
}

impl ToDataModel for PersonalInfo {
    fn to_data_model(&self) -> DataModel {
        let mut model = DataModel::new();
        insert(&mut model, "firstName", string(&self.first_name));
        insert(&mut model, "lastName", string(&self.last_name));
        insert(&mut model, "dateOfBirth", string(&self.date_of_birth));
        insert(&mut model, "email", string(&self.email));
        insert(&mut model, "phoneNumber", string(&self.phone_number));
        model
    }
}

impl ToDataModel for AccountInfo {
    fn to_data_model(&self) -> DataModel {
        let mut model = DataModel::new();
        insert(&mut model, "accountNumber", string(&self.account_number));
        insert(&mut model, "accountType", string(&self.account_type));
        insert(&mut model, "balance", number(self.balance));
        insert(&mut model, "currency", string(&self.currency));
        insert(&mut model, "status", string(&self.status));
        model
    }
}

impl ToDataModel for ContactPreferences {
    fn to_data_model(&self) -> DataModel {
        let mut model = DataModel::new();
        insert(
            &mut model,
            "emailNotifications",
            self.email_notifications.map(Value::Bool),
        );
        insert(
            &mut model,
            "smsNotifications",
            self.sms_notifications.map(Value::Bool),
        );
        insert(&mut model, "preferredLanguage", string(&self.preferred_language));
        model
    }
}

/// Drop every `null` object entry, at any depth.
///
/// Tera prints `null` as empty text. Removing the key instead makes a template
/// that references it fail with "Variable not found". `null` elements of
/// arrays stay in place so indices and lengths are unchanged.
pub(crate) fn prune_nulls(model: DataModel) -> DataModel {
    model
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key, prune_value(value)))
        .collect()
}

fn prune_value(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(prune_nulls(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(prune_value).collect()),
        other => other,
    }
}

// Absent fields are left out of the model entirely
fn insert(model: &mut DataModel, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        model.insert(key.to_string(), value);
    }
}

fn string(value: &Option<String>) -> Option<Value> {
    value.clone().map(Value::String)
}

// NaN and infinities have no JSON form; they are treated as absent
fn number(value: Option<f64>) -> Option<Value> {
    value.and_then(Number::from_f64).map(Value::Number)
}

fn nested<T: ToDataModel>(value: Option<&T>) -> Option<Value> {
    value.map(|v| Value::Object(v.to_data_model()))
}
