use crate::error::TypeMismatchError;
use crate::model::{Mutation, MutationOp, VariableType, VariableValue};

/// Computes the value a mutation produces, without writing it anywhere.
///
/// `current` must already carry `declared` as its type. The result always carries the
/// declared type too, so a store that only writes `Ok` results can never drift.
pub fn apply_mutation(
    mutation: &Mutation,
    declared: VariableType,
    current: &VariableValue,
) -> Result<VariableValue, TypeMismatchError> {
    let key = &mutation.variable_key;
    match (mutation.operation, current) {
        (MutationOp::Set, _) => {
            let operand = require_operand(mutation, declared)?;
            Ok(operand.clone())
        }
        (MutationOp::Increment, VariableValue::Number(n)) => {
            let delta = require_number(mutation)?;
            Ok(VariableValue::Number(n + delta))
        }
        (MutationOp::Decrement, VariableValue::Number(n)) => {
            let delta = require_number(mutation)?;
            Ok(VariableValue::Number(n - delta))
        }
        (MutationOp::Toggle, VariableValue::Boolean(b)) => Ok(VariableValue::Boolean(!b)),
        (MutationOp::Append, VariableValue::String(s)) => {
            let suffix = require_operand(mutation, VariableType::String)?;
            match suffix {
                VariableValue::String(suffix) => Ok(VariableValue::String(format!("{}{}", s, suffix))),
                other => Err(operand_mismatch(mutation, VariableType::String, Some(other))),
            }
        }
        (operation, _) => Err(TypeMismatchError::UnsupportedOperation {
            key: key.clone(),
            operation,
            declared,
        }),
    }
}

fn require_operand(
    mutation: &Mutation,
    expected: VariableType,
) -> Result<&VariableValue, TypeMismatchError> {
    match &mutation.value {
        Some(value) if value.value_type() == expected => Ok(value),
        other => Err(operand_mismatch(mutation, expected, other.as_ref())),
    }
}

fn require_number(mutation: &Mutation) -> Result<f64, TypeMismatchError> {
    require_operand(mutation, VariableType::Number)?
        .as_number()
        .ok_or_else(|| operand_mismatch(mutation, VariableType::Number, mutation.value.as_ref()))
}

fn operand_mismatch(
    mutation: &Mutation,
    expected: VariableType,
    found: Option<&VariableValue>,
) -> TypeMismatchError {
    TypeMismatchError::OperandType {
        key: mutation.variable_key.clone(),
        operation: mutation.operation,
        expected,
        found: found.map(VariableValue::value_type),
    }
}
