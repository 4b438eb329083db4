//! In-memory fakes and fixtures shared by the reconciler and driver tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;

use serde_json::{Map, Value};

use rowsync_model::{
    CollectionSpec, FieldSpec, GeoMode, GeoResult, Geocoder, IdentitySpec, LookupMatch,
    RecordStore, RemoteRecord, StoreError, StoreResult,
};

/// In-memory record store. Interior mutability keeps the `RecordStore`
/// trait's `&self` contract; tests are single-threaded.
#[derive(Default)]
pub struct FakeStore {
    records: RefCell<Vec<(String, RemoteRecord)>>,
    next_id: RefCell<usize>,
    writes: RefCell<usize>,
    last_update_fields: RefCell<Option<Map<String, Value>>>,
    fail_when: RefCell<Option<(String, String)>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every mutating call touching a record whose `field` equals
    /// `value` fail with a store rejection.
    pub fn fail_when(&self, field: &str, value: &str) {
        *self.fail_when.borrow_mut() = Some((field.to_string(), value.to_string()));
    }

    /// Number of mutating calls issued so far.
    pub fn writes(&self) -> usize {
        *self.writes.borrow()
    }

    /// Number of stored records across all collections.
    pub fn record_count(&self) -> usize {
        self.records.borrow().len()
    }

    /// Fields carried by the most recent update call.
    pub fn last_update_fields(&self) -> Option<Map<String, Value>> {
        self.last_update_fields.borrow().clone()
    }

    /// Fetches a stored record by exact field value.
    pub fn get_by_field(&self, field: &str, value: &str) -> Option<RemoteRecord> {
        self.records
            .borrow()
            .iter()
            .find(|(_, record)| field_text(record, field).as_deref() == Some(value))
            .map(|(_, record)| record.clone())
    }

    fn should_fail(&self, fields: &Map<String, Value>) -> bool {
        match &*self.fail_when.borrow() {
            Some((field, value)) => fields
                .get(field)
                .and_then(|v| v.as_str())
                .is_some_and(|v| v == value),
            None => false,
        }
    }

    fn rejection() -> StoreError {
        StoreError::Api {
            status: 400,
            body: "{\"message\":\"Failed to save record.\"}".to_string(),
        }
    }
}

fn field_text(record: &RemoteRecord, field: &str) -> Option<String> {
    record
        .fields
        .get(field)
        .and_then(|value| value.as_str())
        .map(str::to_string)
}

impl RecordStore for FakeStore {
    fn find(
        &self,
        collection: &str,
        field: &str,
        value: &str,
        match_mode: LookupMatch,
    ) -> StoreResult<Option<RemoteRecord>> {
        let records = self.records.borrow();
        let found = records
            .iter()
            .filter(|(name, _)| name == collection)
            .find(|(_, record)| match field_text(record, field) {
                Some(stored) => match match_mode {
                    LookupMatch::Exact => stored == value,
                    LookupMatch::Contains => stored.contains(value),
                },
                None => false,
            })
            .map(|(_, record)| record.clone());
        Ok(found)
    }

    fn create(&self, collection: &str, payload: &Map<String, Value>) -> StoreResult<RemoteRecord> {
        if self.should_fail(payload) {
            return Err(Self::rejection());
        }
        let mut fields = payload.clone();
        let id = match fields.remove("id") {
            Some(Value::String(id)) => id,
            _ => {
                let mut next = self.next_id.borrow_mut();
                *next += 1;
                format!("rec{:03}", *next)
            }
        };
        let record = RemoteRecord { id, fields };
        self.records
            .borrow_mut()
            .push((collection.to_string(), record.clone()));
        *self.writes.borrow_mut() += 1;
        Ok(record)
    }

    fn update(
        &self,
        collection: &str,
        id: &str,
        fields: &Map<String, Value>,
    ) -> StoreResult<RemoteRecord> {
        let mut records = self.records.borrow_mut();
        let Some((_, record)) = records
            .iter_mut()
            .find(|(name, record)| name == collection && record.id == id)
        else {
            return Err(StoreError::Api {
                status: 404,
                body: "{\"message\":\"The requested resource wasn't found.\"}".to_string(),
            });
        };
        if self.should_fail(&record.fields) {
            return Err(Self::rejection());
        }
        for (name, value) in fields {
            record.fields.insert(name.clone(), value.clone());
        }
        *self.last_update_fields.borrow_mut() = Some(fields.clone());
        *self.writes.borrow_mut() += 1;
        Ok(record.clone())
    }
}

/// Geocoder answering from a fixed address book; everything else is
/// unresolved.
#[derive(Default)]
pub struct FakeGeocoder {
    known: BTreeMap<String, GeoResult>,
}

impl FakeGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_address(mut self, address: &str, result: GeoResult) -> Self {
        self.known.insert(address.to_string(), result);
        self
    }
}

impl Geocoder for FakeGeocoder {
    fn resolve(&self, address: &str, _mode: GeoMode) -> GeoResult {
        self.known
            .get(address)
            .cloned()
            .unwrap_or(GeoResult::Unresolved)
    }
}

/// The item-catalog collection used by most tests.
pub fn item_spec() -> CollectionSpec {
    CollectionSpec {
        collection: "Form_Items".to_string(),
        fields: vec![
            FieldSpec::text("Item_Code", &["Item_Code", "Item Code", "Code"]),
            FieldSpec::text("Item_Name", &["Item_Name", "Item Name", "Name"]),
            FieldSpec::text("Unit", &["Unit", "UOM"]),
            FieldSpec::relation("Form", &["Form", "Form_Ids"]),
        ],
        identity: vec![
            IdentitySpec::exact("Item_Code"),
            IdentitySpec::exact("Item_Name"),
        ],
        identity_as_record_id: false,
        relation_field: Some("Form".to_string()),
        address_field: None,
    }
}

/// A customer collection keyed by business code with address enrichment.
pub fn customer_spec() -> CollectionSpec {
    CollectionSpec {
        collection: "customers".to_string(),
        fields: vec![
            FieldSpec::text("CUSTOMER_CODE", &["Customer Code", "CUSTOMER_CODE"]),
            FieldSpec::text("CUSTOMER_NAME", &["Customer Name", "CUSTOMER_NAME"]),
            FieldSpec::text(
                "CUSTOMER_FULL_ADDRESS",
                &["Customer Full Address", "CUSTOMER_FULL_ADDRESS", "Address"],
            ),
        ],
        identity: vec![
            IdentitySpec::exact("CUSTOMER_CODE"),
            IdentitySpec::exact("CUSTOMER_NAME"),
        ],
        identity_as_record_id: true,
        relation_field: None,
        address_field: Some("CUSTOMER_FULL_ADDRESS".to_string()),
    }
}
