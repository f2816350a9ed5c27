use super::*;
use crate::ast::{
    AssignRhs, Catch, DeclareStmt, FunctionDef, Index, PathSeg, Prep, ReturnKind, Stmt, StmtKind,
    TakeCount,
};

impl Interpreter {
    pub fn exec_block(&mut self, stmts: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in stmts {
            self.exec_stmt(stmt)?;
        }
        Ok(())
    }

    pub fn exec_stmt(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        match self.exec_stmt_kind(&stmt.kind) {
            Err(RuntimeError::Error { msg, span: None }) => Err(RuntimeError::Error {
                msg,
                span: Some(stmt.span),
            }),
            other => other,
        }
    }

    fn exec_stmt_kind(&mut self, kind: &StmtKind) -> Result<(), RuntimeError> {
        match kind {
            StmtKind::Declare(decl) => {
                for value in self.declare_values(decl)? {
                    self.produce(value);
                }
                Ok(())
            }
            StmtKind::Define { decl, names } => {
                let values = self.declare_values(decl)?;
                self.it = values.last().cloned().unwrap_or(Value::Unit);
                for (name, value) in names.iter().zip(values) {
                    self.define(name.clone(), value);
                }
                Ok(())
            }
            StmtKind::Naming { names } => {
                if self.staged.len() < names.len() {
                    return Err(RuntimeError::msg("無可名者"));
                }
                let start = self.staged.len() - names.len();
                let values = self.staged.split_off(start);
                for (name, value) in names.iter().zip(values) {
                    self.define(name.clone(), value);
                }
                Ok(())
            }
            StmtKind::Print => {
                let line = wenyan_repr(&self.it);
                self.write_line(line);
                Ok(())
            }
            StmtKind::Discard => {
                self.staged.clear();
                Ok(())
            }
            StmtKind::Expr(expr) => {
                let value = self.eval_expr(expr)?;
                self.produce(value);
                Ok(())
            }
            StmtKind::Math {
                op,
                lhs,
                prep,
                rhs,
                modulo,
            } => {
                let a = self.eval_value(lhs)?;
                let b = self.eval_value(rhs)?;
                let (l, r) = match prep {
                    Prep::Yu => (a, b),
                    Prep::Yi => (b, a),
                };
                let value = if *modulo {
                    self.op_mod(l, r)?
                } else {
                    self.math_op(*op, l, r)?
                };
                self.produce(value);
                Ok(())
            }
            StmtKind::FunctionDef(def) => {
                self.exec_fn_def(def);
                Ok(())
            }
            StmtKind::Call { callee, args } => {
                let callee = self.eval_value(callee)?;
                let mut argv = Vec::with_capacity(args.len());
                for arg in args {
                    argv.push(self.eval_value(arg)?);
                }
                let value = self.call_value(callee, argv)?;
                self.produce(value);
                Ok(())
            }
            StmtKind::CallStaged { count, callee } => {
                let n = match count {
                    TakeCount::N(n) => *n,
                    TakeCount::Rest => self.staged.len(),
                };
                if self.staged.len() < n {
                    return Err(RuntimeError::msg("取數不足"));
                }
                let start = self.staged.len() - n;
                let argv = self.staged.split_off(start);
                let callee = self.eval_value(callee)?;
                let value = self.call_value(callee, argv)?;
                self.produce(value);
                Ok(())
            }
            StmtKind::Fill { target, values } => {
                let list = self.eval_value(target)?;
                let Value::List(items) = &list else {
                    return Err(RuntimeError::msg("充者須列"));
                };
                for value in values {
                    let value = self.eval_value(value)?;
                    items.borrow_mut().push(value);
                }
                let out = list.clone();
                self.produce(out);
                Ok(())
            }
            StmtKind::Concat { target, values } => {
                let base = self.eval_value(target)?;
                let mut result = match &base {
                    Value::List(items) => Value::list(items.borrow().clone()),
                    Value::Str(s) => Value::Str(s.clone()),
                    _ => return Err(RuntimeError::msg("銜者須列或言")),
                };
                for value in values {
                    let value = self.eval_value(value)?;
                    match (&mut result, value) {
                        (Value::List(items), Value::List(other)) => {
                            items.borrow_mut().extend(other.borrow().iter().cloned());
                        }
                        (Value::Str(s), Value::Str(other)) => s.push_str(&other),
                        _ => return Err(RuntimeError::msg("銜者類不合")),
                    }
                }
                self.produce(result);
                Ok(())
            }
            StmtKind::If { clauses, else_body } => {
                for (cond, body) in clauses {
                    if self.eval_cond(cond)? {
                        return self.exec_block(body);
                    }
                }
                if let Some(body) = else_body {
                    return self.exec_block(body);
                }
                Ok(())
            }
            StmtKind::WhileTrue { body } => loop {
                match self.exec_block(body) {
                    Ok(()) | Err(RuntimeError::Continue) => {}
                    Err(RuntimeError::Break) => return Ok(()),
                    Err(e) => return Err(e),
                }
            },
            StmtKind::ForCount { count, body } => {
                let n = match self.eval_value(count)? {
                    Value::Int(n) => n,
                    _ => return Err(RuntimeError::msg("遍數須整數")),
                };
                for _ in 0..n.max(0) {
                    match self.exec_block(body) {
                        Ok(()) | Err(RuntimeError::Continue) => {}
                        Err(RuntimeError::Break) => return Ok(()),
                        Err(e) => return Err(e),
                    }
                }
                Ok(())
            }
            StmtKind::ForEach { list, var, body } => {
                let value = self.eval_value(list)?;
                let items: Vec<Value> = match &value {
                    Value::List(items) => items.borrow().clone(),
                    Value::Str(s) => s.chars().map(|c| Value::Str(c.to_string())).collect(),
                    _ => return Err(RuntimeError::msg("凡者須列")),
                };
                for item in items {
                    self.define(var.clone(), item);
                    match self.exec_block(body) {
                        Ok(()) | Err(RuntimeError::Continue) => {}
                        Err(RuntimeError::Break) => return Ok(()),
                        Err(e) => return Err(e),
                    }
                }
                Ok(())
            }
            StmtKind::Break => Err(RuntimeError::Break),
            StmtKind::Continue => Err(RuntimeError::Continue),
            StmtKind::Return(kind) => {
                let value = match kind {
                    ReturnKind::Value(v) => self.eval_value(v)?,
                    ReturnKind::It => self.it.clone(),
                    ReturnKind::Unit => Value::Unit,
                };
                Err(RuntimeError::Return(Box::new(value)))
            }
            StmtKind::Assign { target, index, rhs } => self.exec_assign(target, index, rhs),
            StmtKind::ObjectDef { names, props, .. } => {
                let mut last = Value::Unit;
                for name in names {
                    let mut fields = Vec::with_capacity(props.len());
                    for prop in props {
                        fields.push((prop.key.clone(), self.eval_value(&prop.value)?));
                    }
                    let obj = Value::object(fields);
                    last = obj.clone();
                    self.define(name.clone(), obj);
                }
                self.it = last;
                Ok(())
            }
            StmtKind::Throw { tag, detail } => {
                let tag = self.eval_value(tag)?;
                let mut fields = vec![("名".to_string(), tag)];
                if let Some(detail) = detail {
                    fields.push(("詳".to_string(), self.eval_value(detail)?));
                }
                Err(RuntimeError::Raised(Box::new(Value::object(fields))))
            }
            StmtKind::Try { body, catches } => self.exec_try(body, catches),
            StmtKind::Import { path, names } => self.exec_import(path, names.as_deref()),
            StmtKind::Comment { .. } => Ok(()),
        }
    }

    /// Evaluate a declaration's initialisers, padding uninitialised slots
    /// with the type's zero value.
    fn declare_values(&mut self, decl: &DeclareStmt) -> Result<Vec<Value>, RuntimeError> {
        let mut values = Vec::with_capacity(decl.count);
        for init in &decl.inits {
            values.push(self.eval_value(init)?);
        }
        while values.len() < decl.count {
            values.push(Value::default_for(decl.ty));
        }
        Ok(values)
    }

    pub fn exec_fn_def(&mut self, def: &FunctionDef) {
        let mut params = Vec::new();
        for group in &def.param_groups {
            for name in &group.names {
                params.push((name.clone(), group.ty));
            }
        }
        let func = Function {
            name: def.name.clone(),
            params,
            rest: def.rest_param.as_ref().map(|r| r.name.clone()),
            body: Rc::new(def.body.clone()),
            env: self.env.clone(),
            bound: Vec::new(),
        };
        self.define(def.name.clone(), Value::Fn(Rc::new(func)));
    }

    fn exec_assign(
        &mut self,
        target: &str,
        index: &Option<Index>,
        rhs: &AssignRhs,
    ) -> Result<(), RuntimeError> {
        match rhs {
            AssignRhs::Delete => match index {
                None => self.assign_existing(target, Value::Unit),
                Some(Index::At(key)) => {
                    let container = self.lookup(target)?;
                    let key = self.eval_value(key)?;
                    match (&container, &key) {
                        (Value::List(items), Value::Int(n)) => {
                            let mut items = items.borrow_mut();
                            // Out-of-range deletes leave the list unchanged.
                            if *n >= 1 && (*n as usize) <= items.len() {
                                items.remove(*n as usize - 1);
                            }
                            Ok(())
                        }
                        (Value::Object(fields), Value::Str(k)) => {
                            fields.borrow_mut().retain(|(name, _)| name != k);
                            Ok(())
                        }
                        _ => Err(RuntimeError::msg("不可刪之")),
                    }
                }
                Some(Index::Rest) => Err(RuntimeError::msg("其餘不可刪")),
            },
            AssignRhs::Value { value, index: from } => {
                let mut value = self.eval_value(value)?;
                if let Some(from) = from {
                    value = self.read_index(value, from)?;
                }
                match index {
                    None => self.assign_existing(target, value),
                    Some(Index::At(key)) => {
                        let container = self.lookup(target)?;
                        let key = self.eval_value(key)?;
                        match (&container, &key) {
                            (Value::List(items), Value::Int(n)) => {
                                let mut items = items.borrow_mut();
                                if *n < 1 || (*n as usize) > items.len() {
                                    return Err(RuntimeError::msg("列序過界"));
                                }
                                items[*n as usize - 1] = value;
                                Ok(())
                            }
                            (Value::Object(fields), Value::Str(k)) => {
                                let mut fields = fields.borrow_mut();
                                match fields.iter_mut().find(|(name, _)| name == k) {
                                    Some(entry) => entry.1 = value,
                                    None => fields.push((k.clone(), value)),
                                }
                                Ok(())
                            }
                            _ => Err(RuntimeError::msg("不可易之")),
                        }
                    }
                    Some(Index::Rest) => Err(RuntimeError::msg("其餘不可易")),
                }
            }
        }
    }

    fn exec_try(&mut self, body: &[Stmt], catches: &[Catch]) -> Result<(), RuntimeError> {
        let err = match self.exec_block(body) {
            Ok(()) => return Ok(()),
            Err(RuntimeError::Raised(err)) => *err,
            Err(e) => return Err(e),
        };
        // `如事不諧乃作罷` with no clauses gives up silently.
        if catches.is_empty() {
            return Ok(());
        }
        for catch in catches {
            let matched = match &catch.tag {
                None => true,
                Some(tag) => {
                    let tag = self.eval_value(tag)?;
                    self.values_eq(&tag, &error_name(&err))
                }
            };
            if matched {
                if let Some(bind) = &catch.bind {
                    self.define(bind.clone(), err.clone());
                }
                return self.exec_block(&catch.body);
            }
        }
        Err(RuntimeError::Raised(Box::new(err)))
    }

    fn exec_import(
        &mut self,
        path: &[PathSeg],
        names: Option<&[String]>,
    ) -> Result<(), RuntimeError> {
        let segments: Vec<String> = path
            .iter()
            .map(|seg| match seg {
                PathSeg::Str(s) | PathSeg::Ident(s) => s.clone(),
            })
            .collect();
        let exports = self.load_module(&segments)?;
        if let Some(names) = names {
            for name in names {
                let value = exports
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RuntimeError::msg(format!("書中無「{}」之義", name)))?;
                self.define(name.clone(), value);
            }
        }
        Ok(())
    }
}

/// What a typed catch compares against: the error object's `名` field.
fn error_name(err: &Value) -> Value {
    if let Value::Object(fields) = err {
        if let Some((_, value)) = fields.borrow().iter().find(|(key, _)| key == "名") {
            return value.clone();
        }
    }
    err.clone()
}
