// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Demo record served by the `livestruct` binary.

use livestruct_schema::{field, FromValue, Record, SchemaBuilder, SchemaError, TypeDescriptor, Value};

/// A person, exported with Go-style field names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
}

impl Default for Person {
    fn default() -> Self {
        Self {
            first_name: "ben".into(),
            last_name: "pritchard".into(),
            age: 42,
        }
    }
}

impl Person {
    /// One updater batch: the person has a birthday.
    pub fn tick(&mut self) {
        self.age = self.age.wrapping_add(1);
    }
}

impl Record for Person {
    fn type_descriptor() -> TypeDescriptor {
        SchemaBuilder::new("Person")
            .string_field("FirstName")
            .string_field("LastName")
            .int_field("Age")
            .build()
    }

    fn to_value(&self) -> Value {
        Value::object([
            ("FirstName", self.first_name.as_str().into()),
            ("LastName", self.last_name.as_str().into()),
            ("Age", self.age.into()),
        ])
    }
}

impl FromValue for Person {
    fn from_value(value: &Value) -> Result<Self, SchemaError> {
        Ok(Self {
            first_name: field(value, "FirstName")?,
            last_name: field(value, "LastName")?,
            age: field(value, "Age")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livestruct_schema::Schema;

    #[test]
    fn test_person_bytes() {
        let schema = Schema::of::<Person>().expect("schema");
        let bytes = schema.encode_record(&Person::default()).expect("encode");
        assert_eq!(
            bytes,
            [
                0x03, 0x62, 0x65, 0x6e, 0x09, 0x70, 0x72, 0x69, 0x74, 0x63, 0x68, 0x61, 0x72,
                0x64, 0x54
            ]
        );
        let back: Person = schema.decode_record(&bytes).expect("decode");
        assert_eq!(back, Person::default());
    }

    #[test]
    fn test_tick() {
        let mut person = Person::default();
        person.tick();
        assert_eq!(person.age, 43);
    }
}
