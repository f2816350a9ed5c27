use std::cmp::Ordering;

use super::*;
use crate::ast::{BinOp, MathOp};

impl Interpreter {
    /// Truthiness: `陰`/`陽`; numbers nonzero; strings, lists and objects
    /// nonempty; `空無` false; functions true.
    pub fn truthy(&self, value: &Value) -> bool {
        match value {
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::Object(fields) => !fields.borrow().is_empty(),
            Value::Unit => false,
            Value::Fn(_) => true,
        }
    }

    /// `等於` — deep equality, with Int/Float comparing by value.
    pub fn values_eq(&self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Int(x), Value::Float(y)) | (Value::Float(y), Value::Int(x)) => {
                *x as f64 == *y
            }
            (Value::List(x), Value::List(y)) => {
                let x = x.borrow();
                let y = y.borrow();
                x.len() == y.len()
                    && x.iter().zip(y.iter()).all(|(a, b)| self.values_eq(a, b))
            }
            (Value::Object(x), Value::Object(y)) => {
                let x = x.borrow();
                let y = y.borrow();
                x.len() == y.len()
                    && x.iter()
                        .zip(y.iter())
                        .all(|((k1, v1), (k2, v2))| k1 == k2 && self.values_eq(v1, v2))
            }
            _ => a == b,
        }
    }

    pub(super) fn eval_binop(
        &self,
        op: BinOp,
        left: Value,
        right: Value,
    ) -> Result<Value, RuntimeError> {
        match op {
            BinOp::Eq => Ok(Value::Bool(self.values_eq(&left, &right))),
            BinOp::Neq => Ok(Value::Bool(!self.values_eq(&left, &right))),
            BinOp::Or => Ok(Value::Bool(self.truthy(&left) || self.truthy(&right))),
            BinOp::And => Ok(Value::Bool(self.truthy(&left) && self.truthy(&right))),
            BinOp::Lt | BinOp::Gt | BinOp::Lte | BinOp::Gte => {
                self.op_compare(&left, &right, op)
            }
        }
    }

    pub(super) fn math_op(
        &self,
        op: MathOp,
        left: Value,
        right: Value,
    ) -> Result<Value, RuntimeError> {
        match op {
            MathOp::Add => self.op_add(left, right),
            MathOp::Sub => self.op_sub(left, right),
            MathOp::Mul => self.op_mul(left, right),
            MathOp::Div => self.op_div(left, right),
        }
    }

    fn op_add(&self, a: Value, b: Value) -> Result<Value, RuntimeError> {
        match (&a, &b) {
            (Value::Int(x), Value::Int(y)) => x
                .checked_add(*y)
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::msg("數字過大")),
            (Value::Float(x), Value::Float(y)) => Ok(Value::Float(x + y)),
            (Value::Int(x), Value::Float(y)) => Ok(Value::Float(*x as f64 + y)),
            (Value::Float(x), Value::Int(y)) => Ok(Value::Float(x + *y as f64)),
            _ => Err(RuntimeError::msg("加者須數")),
        }
    }

    fn op_sub(&self, a: Value, b: Value) -> Result<Value, RuntimeError> {
        match (&a, &b) {
            (Value::Int(x), Value::Int(y)) => x
                .checked_sub(*y)
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::msg("數字過大")),
            (Value::Float(x), Value::Float(y)) => Ok(Value::Float(x - y)),
            (Value::Int(x), Value::Float(y)) => Ok(Value::Float(*x as f64 - y)),
            (Value::Float(x), Value::Int(y)) => Ok(Value::Float(x - *y as f64)),
            _ => Err(RuntimeError::msg("減者須數")),
        }
    }

    fn op_mul(&self, a: Value, b: Value) -> Result<Value, RuntimeError> {
        match (&a, &b) {
            (Value::Int(x), Value::Int(y)) => x
                .checked_mul(*y)
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::msg("數字過大")),
            (Value::Float(x), Value::Float(y)) => Ok(Value::Float(x * y)),
            (Value::Int(x), Value::Float(y)) => Ok(Value::Float(*x as f64 * y)),
            (Value::Float(x), Value::Int(y)) => Ok(Value::Float(x * *y as f64)),
            _ => Err(RuntimeError::msg("乘者須數")),
        }
    }

    /// Int/Int division stays exact when it divides evenly, otherwise
    /// promotes to float.
    fn op_div(&self, a: Value, b: Value) -> Result<Value, RuntimeError> {
        match (&a, &b) {
            (Value::Int(x), Value::Int(y)) => {
                if *y == 0 {
                    Err(RuntimeError::msg("除以零"))
                } else if x % y == 0 {
                    Ok(Value::Int(x / y))
                } else {
                    Ok(Value::Float(*x as f64 / *y as f64))
                }
            }
            (Value::Float(x), Value::Float(y)) => {
                if *y == 0.0 {
                    Err(RuntimeError::msg("除以零"))
                } else {
                    Ok(Value::Float(x / y))
                }
            }
            (Value::Int(x), Value::Float(y)) => Ok(Value::Float(*x as f64 / y)),
            (Value::Float(x), Value::Int(y)) => Ok(Value::Float(x / *y as f64)),
            _ => Err(RuntimeError::msg("除者須數")),
        }
    }

    /// `除 … 所餘幾何`
    pub(super) fn op_mod(&self, a: Value, b: Value) -> Result<Value, RuntimeError> {
        match (&a, &b) {
            (Value::Int(x), Value::Int(y)) => {
                if *y == 0 {
                    Err(RuntimeError::msg("除以零"))
                } else {
                    Ok(Value::Int(x % y))
                }
            }
            _ => {
                let x = self.as_number(&a)?;
                let y = self.as_number(&b)?;
                if y == 0.0 {
                    Err(RuntimeError::msg("除以零"))
                } else {
                    Ok(Value::Float(x % y))
                }
            }
        }
    }

    fn op_compare(&self, a: &Value, b: &Value, op: BinOp) -> Result<Value, RuntimeError> {
        let ord = match (a, b) {
            (Value::Str(x), Value::Str(y)) => x.partial_cmp(y),
            _ => {
                let x = self.as_number(a)?;
                let y = self.as_number(b)?;
                x.partial_cmp(&y)
            }
        };
        let Some(ord) = ord else {
            return Err(RuntimeError::msg("比不得"));
        };
        let result = match op {
            BinOp::Lt => ord == Ordering::Less,
            BinOp::Gt => ord == Ordering::Greater,
            BinOp::Lte => ord != Ordering::Greater,
            BinOp::Gte => ord != Ordering::Less,
            _ => unreachable!(),
        };
        Ok(Value::Bool(result))
    }

    fn as_number(&self, value: &Value) -> Result<f64, RuntimeError> {
        match value {
            Value::Int(n) => Ok(*n as f64),
            Value::Float(f) => Ok(*f),
            _ => Err(RuntimeError::msg("非數也")),
        }
    }
}
