//! Shared test doubles for record tests: a small rule engine, a
//! deterministic hasher and an in-memory store the engine can look into.

#![allow(dead_code)]

use recordgate_crypto::{HashResult, PasswordHasher};
use recordgate_model::{
    Attributes, ErrorCollection, Persistence, RecordSchema, RecordType, RuleEngine, RuleSet,
    ValidationReport,
};
use recordgate_rules::RuleToken;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Rows per table.
pub type Tables = Arc<Mutex<BTreeMap<String, Vec<Attributes>>>>;

pub fn attrs(value: Value) -> Attributes {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── Rule engine ──────────────────────────────────────────────────

/// Understands `required`, `max:N`, `confirmed`, `email` and
/// `unique:table,column[,except[,keyColumn]]`.
pub struct FakeEngine {
    tables: Tables,
    pub calls: AtomicUsize,
    pub last_rules: Mutex<Option<RuleSet>>,
}

impl FakeEngine {
    pub fn new(tables: Tables) -> Self {
        Self {
            tables,
            calls: AtomicUsize::new(0),
            last_rules: Mutex::new(None),
        }
    }

    fn check(&self, data: &Attributes, field: &str, token: &RuleToken) -> Option<String> {
        let value = data.get(field).filter(|v| !v.is_null());
        match token.name.as_str() {
            "required" => match value {
                None => Some(format!("The {field} field is required.")),
                Some(Value::String(s)) if s.is_empty() => {
                    Some(format!("The {field} field is required."))
                }
                _ => None,
            },
            "max" => {
                let max: usize = token.param(0)?.parse().ok()?;
                let len = value?.as_str()?.chars().count();
                (len > max).then(|| {
                    format!("The {field} may not be greater than {max} characters.")
                })
            }
            "email" => {
                let text = value?.as_str()?;
                (!text.contains('@')).then(|| format!("The {field} must be a valid email address."))
            }
            "confirmed" => {
                let confirmation = data.get(&format!("{field}_confirmation"));
                (confirmation != value).then(|| format!("The {field} confirmation does not match."))
            }
            "unique" => {
                let value = value?;
                let table = token.param(0)?;
                let column = token.param(1).unwrap_or(field);
                let except = token.param(2).filter(|e| *e != "NULL");
                let key_column = token.param(3).unwrap_or("id");

                let tables = self.tables.lock().unwrap();
                let taken = tables.get(table).is_some_and(|rows| {
                    rows.iter().any(|row| {
                        row.get(column) == Some(value)
                            && match except {
                                Some(except) => {
                                    row.get(key_column).map(render).as_deref() != Some(except)
                                }
                                None => true,
                            }
                    })
                });
                taken.then(|| format!("The {field} has already been taken."))
            }
            _ => None,
        }
    }
}

impl RuleEngine for FakeEngine {
    fn validate(&self, data: &Attributes, rules: &RuleSet) -> ValidationReport {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_rules.lock().unwrap() = Some(rules.clone());

        let mut errors = ErrorCollection::new();
        for (field, tokens) in rules.iter() {
            for raw in tokens {
                let Ok(token) = RuleToken::parse(raw) else {
                    continue;
                };
                if let Some(message) = self.check(data, field, &token) {
                    errors.add(field, message);
                }
            }
        }

        if errors.is_empty() {
            ValidationReport::passed()
        } else {
            ValidationReport::failed(errors)
        }
    }
}

// ── Hasher ───────────────────────────────────────────────────────

/// Deterministic stand-in: `hashed(<plaintext>)`. Counts calls.
#[derive(Default)]
pub struct CountingHasher {
    pub calls: AtomicUsize,
}

impl CountingHasher {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PasswordHasher for CountingHasher {
    fn hash(&self, plaintext: &str) -> HashResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("hashed({plaintext})"))
    }

    fn verify(&self, plaintext: &str, hashed: &str) -> HashResult<bool> {
        Ok(format!("hashed({plaintext})") == hashed)
    }
}

// ── Store ────────────────────────────────────────────────────────

/// In-memory storage sharing its tables with [`FakeEngine`].
pub struct MemoryStore {
    pub tables: Tables,
    pub inserts: usize,
    pub updates: usize,
    pub reject_writes: bool,
    next_id: u64,
}

impl MemoryStore {
    pub fn new(tables: Tables) -> Self {
        Self {
            tables,
            inserts: 0,
            updates: 0,
            reject_writes: false,
            next_id: 1,
        }
    }

    pub fn rows(&self, table: &str) -> Vec<Attributes> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Inserts a row directly, bypassing any record.
    pub fn seed(&mut self, table: &str, row: Value) {
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(attrs(row));
    }
}

impl Persistence for MemoryStore {
    fn insert(&mut self, table: &str, attributes: &mut Attributes) -> bool {
        self.inserts += 1;
        if self.reject_writes {
            return false;
        }
        if !attributes.contains_key("id") {
            attributes.insert("id".into(), json!(self.next_id));
            self.next_id += 1;
        }
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(attributes.clone());
        true
    }

    fn update(
        &mut self,
        table: &str,
        primary_key: &str,
        key: &Value,
        attributes: &Attributes,
    ) -> bool {
        self.updates += 1;
        if self.reject_writes {
            return false;
        }
        let mut tables = self.tables.lock().unwrap();
        let Some(row) = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|row| row.get(primary_key) == Some(key)))
        else {
            return false;
        };
        *row = attributes.clone();
        true
    }
}

// ── Fixtures ─────────────────────────────────────────────────────

pub struct Harness {
    pub tables: Tables,
    pub engine: Arc<FakeEngine>,
    pub hasher: Arc<CountingHasher>,
    pub store: MemoryStore,
    pub users: RecordType,
}

impl Harness {
    pub fn new(schema: RecordSchema) -> Self {
        let tables: Tables = Arc::default();
        let engine = Arc::new(FakeEngine::new(Arc::clone(&tables)));
        let hasher = Arc::new(CountingHasher::default());
        let users = RecordType::new(schema, engine.clone(), hasher.clone());
        Self {
            store: MemoryStore::new(Arc::clone(&tables)),
            tables,
            engine,
            hasher,
            users,
        }
    }

    pub fn users() -> Self {
        Self::new(users_schema())
    }
}

pub fn users_schema() -> RecordSchema {
    RecordSchema::builder("users")
        .rule("name", "required|max:50")
        .rule("email", "required|email|unique:users,email")
        .rule("password", "required|confirmed")
        .build()
}
