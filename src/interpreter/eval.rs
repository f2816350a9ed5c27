use super::*;
use crate::ast;

impl Interpreter {
    pub fn eval_value(&mut self, value: &ast::Value) -> Result<Value, RuntimeError> {
        match value {
            ast::Value::Int(n) => Ok(Value::Int(*n)),
            ast::Value::Float(f) => Ok(Value::Float(*f)),
            ast::Value::Str(s) => Ok(Value::Str(s.clone())),
            ast::Value::Bool(b) => Ok(Value::Bool(*b)),
            ast::Value::Ident(name) => self.lookup(name),
            ast::Value::It => Ok(self.it.clone()),
        }
    }

    pub fn eval_expr(&mut self, expr: &ast::Expr) -> Result<Value, RuntimeError> {
        match expr {
            ast::Expr::Value(v) => self.eval_value(v),
            ast::Expr::Subscript { target, index } => {
                let container = self.eval_value(target)?;
                self.read_index(container, index)
            }
            ast::Expr::Length(v) => {
                let value = self.eval_value(v)?;
                match &value {
                    Value::List(items) => Ok(Value::Int(items.borrow().len() as i64)),
                    Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
                    Value::Object(fields) => Ok(Value::Int(fields.borrow().len() as i64)),
                    _ => Err(RuntimeError::msg("無長可言")),
                }
            }
            ast::Expr::Not(inner) => {
                let value = self.eval_expr(inner)?;
                Ok(Value::Bool(!self.truthy(&value)))
            }
            ast::Expr::Binary { op, lhs, rhs } => {
                let l = self.eval_expr(lhs)?;
                let r = self.eval_expr(rhs)?;
                self.eval_binop(*op, l, r)
            }
        }
    }

    pub(super) fn eval_cond(&mut self, cond: &ast::IfCond) -> Result<bool, RuntimeError> {
        match cond {
            ast::IfCond::Expr(expr) => {
                let value = self.eval_expr(expr)?;
                Ok(self.truthy(&value))
            }
            ast::IfCond::ItTrue => Ok(self.truthy(&self.it)),
            ast::IfCond::ItFalse => Ok(!self.truthy(&self.it)),
        }
    }

    /// `之 …` reads: 1-based list/string positions, object string keys,
    /// `其餘` for the tail.
    pub(super) fn read_index(
        &mut self,
        container: Value,
        index: &ast::Index,
    ) -> Result<Value, RuntimeError> {
        match index {
            ast::Index::At(key) => {
                let key = self.eval_value(key)?;
                match (&container, &key) {
                    (Value::List(items), Value::Int(n)) => {
                        let items = items.borrow();
                        if *n < 1 || (*n as usize) > items.len() {
                            return Err(RuntimeError::msg("列序過界"));
                        }
                        Ok(items[*n as usize - 1].clone())
                    }
                    (Value::Str(s), Value::Int(n)) => {
                        let ch = if *n >= 1 {
                            s.chars().nth(*n as usize - 1)
                        } else {
                            None
                        };
                        ch.map(|c| Value::Str(c.to_string()))
                            .ok_or_else(|| RuntimeError::msg("言序過界"))
                    }
                    (Value::Object(fields), Value::Str(k)) => fields
                        .borrow()
                        .iter()
                        .find(|(name, _)| name == k)
                        .map(|(_, v)| Ok(v.clone()))
                        .unwrap_or_else(|| {
                            Err(RuntimeError::msg(format!("物無「{}」", k)))
                        }),
                    _ => Err(RuntimeError::msg("不可索引")),
                }
            }
            ast::Index::Rest => match &container {
                Value::List(items) => Ok(Value::list(
                    items.borrow().iter().skip(1).cloned().collect(),
                )),
                Value::Str(s) => Ok(Value::Str(s.chars().skip(1).collect())),
                _ => Err(RuntimeError::msg("無其餘可言")),
            },
        }
    }

    // -------------------------------------------------------------------
    // Calls
    // -------------------------------------------------------------------

    pub fn call_value(&mut self, callee: Value, args: Vec<Value>) -> Result<Value, RuntimeError> {
        match callee {
            Value::Fn(func) => self.call_function(func, args),
            other => Err(RuntimeError::msg(format!(
                "非術也: {}",
                wenyan_repr(&other)
            ))),
        }
    }

    /// Wenyan calls curry: fewer arguments than parameters yields a
    /// partially-applied function; surplus arguments either fill the rest
    /// parameter or are fed to the returned value.
    fn call_function(
        &mut self,
        func: Rc<Function>,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let mut all = func.bound.clone();
        all.extend(args);
        let arity = func.params.len();

        if all.len() < arity {
            let mut partial = (*func).clone();
            partial.bound = all;
            return Ok(Value::Fn(Rc::new(partial)));
        }

        let surplus = all.split_off(arity);
        if func.rest.is_some() {
            return self.invoke(&func, all, surplus);
        }
        let result = self.invoke(&func, all, Vec::new())?;
        if surplus.is_empty() {
            Ok(result)
        } else {
            self.call_value(result, surplus)
        }
    }

    fn invoke(
        &mut self,
        func: &Function,
        args: Vec<Value>,
        rest: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let saved_env = std::mem::replace(&mut self.env, func.env.clone());
        let saved_staged = std::mem::take(&mut self.staged);
        let saved_it = std::mem::replace(&mut self.it, Value::Unit);
        self.push_scope();

        for ((name, _), value) in func.params.iter().zip(args) {
            self.define(name.clone(), value);
        }
        if let Some(rest_name) = &func.rest {
            self.define(rest_name.clone(), Value::list(rest));
        }

        let outcome = self.exec_block(&func.body);

        self.env = saved_env;
        self.staged = saved_staged;
        self.it = saved_it;

        match outcome {
            Ok(()) => Ok(Value::Unit),
            Err(RuntimeError::Return(value)) => Ok(*value),
            Err(RuntimeError::Break) => Err(RuntimeError::msg("乃止須在循環中")),
            Err(RuntimeError::Continue) => Err(RuntimeError::msg("乃止是遍須在循環中")),
            Err(e) => Err(e),
        }
    }
}
