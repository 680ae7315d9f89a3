use std::fmt;

use serde::de::{value::MapAccessDeserializer, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::product::Product;
use crate::user::User;

/// The entire persisted state. It is always read and written as one unit.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Database {
    pub products: Vec<Product>,
    pub users: Vec<User>,
}

#[derive(Deserialize)]
struct DatabaseFields {
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    users: Vec<User>,
}

struct DatabaseVisitor;

impl<'de> Visitor<'de> for DatabaseVisitor {
    type Value = Database;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object with `products` and `users` arrays")
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Database, A::Error> {
        let DatabaseFields { products, users } = DatabaseFields::deserialize(MapAccessDeserializer::new(map))?;
        Ok(Database { products, users })
    }
}

// Only a top-level object is a snapshot; the derived impl would also take a sequence.
impl<'de> Deserialize<'de> for Database {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DatabaseVisitor)
    }
}

impl Database {
    pub fn product(&self, id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn product_mut(&mut self, id: i64) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }

    /// Drop every product with this id; true if anything was removed.
    pub fn remove_product(&mut self, id: i64) -> bool {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        self.products.len() != before
    }

    pub fn user(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn remove_user(&mut self, id: i64) -> bool {
        let before = self.users.len();
        self.users.retain(|u| u.id != id);
        self.users.len() != before
    }

    /// Exact match on both email and password.
    pub fn user_by_credentials(&self, email: &str, password: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email == email && u.password == password)
    }
}
