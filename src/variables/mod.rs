use crate::error::TypeMismatchError;
use crate::model::{Mutation, Variable, VariableType, VariableValue};
use ahash::AHashMap;
use serde::Serialize;

mod mutation;

pub use mutation::apply_mutation;

/// A mutation the store refused, with the reason it was refused.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedMutation {
    pub mutation: Mutation,
    pub reason: String,
}

/// The result of applying an ordered list of mutations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationReport {
    pub applied: Vec<Mutation>,
    pub rejected: Vec<RejectedMutation>,
}

/// The typed runtime value table for one play session.
///
/// Holds exactly one value per declared variable, and each value always carries the
/// variable's declared type.
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    types: AHashMap<String, VariableType>,
    values: AHashMap<String, VariableValue>,
}

impl VariableStore {
    pub fn new(definitions: &[Variable]) -> Self {
        let mut store = Self::default();
        store.initialize(definitions);
        store
    }

    /// Seeds every declared variable from its initial value, discarding all prior state.
    pub fn initialize(&mut self, definitions: &[Variable]) {
        self.types.clear();
        self.values.clear();
        for definition in definitions {
            let seed = if definition.initial_value.value_type() == definition.var_type {
                definition.initial_value.clone()
            } else {
                tracing::warn!(
                    "Variable '{}' is declared {} but its initial value is {}; seeding {}",
                    definition.key,
                    definition.var_type,
                    definition.initial_value,
                    definition.var_type.zero_value()
                );
                definition.var_type.zero_value()
            };
            self.types.insert(definition.key.clone(), definition.var_type);
            self.values.insert(definition.key.clone(), seed);
        }
    }

    pub fn get(&self, key: &str) -> Option<&VariableValue> {
        self.values.get(key)
    }

    pub fn declared_type(&self, key: &str) -> Option<VariableType> {
        self.types.get(key).copied()
    }

    pub fn values(&self) -> &AHashMap<String, VariableValue> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Applies one mutation. On error the store is left untouched.
    pub fn apply(&mut self, mutation: &Mutation) -> Result<VariableValue, TypeMismatchError> {
        let key = &mutation.variable_key;
        let (declared, current) = match (self.types.get(key), self.values.get(key)) {
            (Some(declared), Some(current)) => (*declared, current),
            _ => return Err(TypeMismatchError::UndeclaredVariable(key.clone())),
        };
        let next = apply_mutation(mutation, declared, current)?;
        self.values.insert(key.clone(), next.clone());
        Ok(next)
    }

    /// Applies mutations strictly in order. Rejected entries are skipped; the rest still apply.
    pub fn apply_all(&mut self, mutations: &[Mutation]) -> MutationReport {
        let mut report = MutationReport::default();
        for mutation in mutations {
            match self.apply(mutation) {
                Ok(value) => {
                    tracing::debug!("Applied {} (now {})", mutation, value);
                    report.applied.push(mutation.clone());
                }
                Err(e) => {
                    tracing::warn!("Skipped mutation {}: {}", mutation, e);
                    report.rejected.push(RejectedMutation {
                        mutation: mutation.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        report
    }
}
