use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use crate::ast::Program;
use crate::source::{canonicalize_path, find_module_file, parse_source};
// Re-export value types so `use wenyan::interpreter::Value` works.
pub use crate::value::{wenyan_repr, Function, RuntimeError, Scope, ScopeChain, Value};

mod eval;
mod exec;
mod ops;

pub struct Interpreter {
    env: ScopeChain,
    /// Values produced but not yet named or taken (`夫 … 取 … 以施`).
    staged: Vec<Value>,
    /// The implicit last-value register `其`.
    it: Value,
    module_root: Option<PathBuf>,
    module_cache: HashMap<String, Scope>,
    /// Canonical paths of books currently being loaded (cycle guard).
    loading: Vec<String>,
    /// When set, `書之` collects lines here instead of writing to stdout.
    capture: Option<Vec<String>>,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            env: vec![Rc::new(RefCell::new(HashMap::new()))],
            staged: Vec::new(),
            it: Value::Unit,
            module_root: None,
            module_cache: HashMap::new(),
            loading: Vec::new(),
            capture: None,
        }
    }

    /// Buffer `書之` output instead of printing (used by tests).
    pub fn with_capture() -> Self {
        let mut interp = Interpreter::new();
        interp.capture = Some(Vec::new());
        interp
    }

    pub fn set_module_root(&mut self, root: PathBuf) {
        self.module_root = Some(root);
    }

    pub fn captured(&self) -> &[String] {
        self.capture.as_deref().unwrap_or(&[])
    }

    /// The current value of `其`.
    pub fn it(&self) -> &Value {
        &self.it
    }

    /// Execute a whole program. Control-flow signals escaping to the top
    /// level become user-visible errors here.
    pub fn run(&mut self, program: &Program) -> Result<(), RuntimeError> {
        for stmt in program {
            match self.exec_stmt(stmt) {
                Ok(()) => {}
                Err(RuntimeError::Raised(err)) => {
                    return Err(RuntimeError::Error {
                        msg: format!("未獲之禍「{}」", raised_tag(&err)),
                        span: Some(stmt.span),
                    });
                }
                Err(RuntimeError::Return(_)) => {
                    return Err(RuntimeError::Error {
                        msg: "乃得須在術中".to_string(),
                        span: Some(stmt.span),
                    });
                }
                Err(RuntimeError::Break) => {
                    return Err(RuntimeError::Error {
                        msg: "乃止須在循環中".to_string(),
                        span: Some(stmt.span),
                    });
                }
                Err(RuntimeError::Continue) => {
                    return Err(RuntimeError::Error {
                        msg: "乃止是遍須在循環中".to_string(),
                        span: Some(stmt.span),
                    });
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    pub(super) fn write_line(&mut self, line: String) {
        match &mut self.capture {
            Some(buffer) => buffer.push(line),
            None => println!("{}", line),
        }
    }

    // -------------------------------------------------------------------
    // Environment management
    // -------------------------------------------------------------------

    pub(super) fn push_scope(&mut self) {
        self.env.push(Rc::new(RefCell::new(HashMap::new())));
    }

    pub fn define(&mut self, name: String, val: Value) {
        if let Some(scope) = self.env.last() {
            scope.borrow_mut().insert(name, val);
        }
    }

    pub fn lookup(&self, name: &str) -> Result<Value, RuntimeError> {
        for scope in self.env.iter().rev() {
            if let Some(v) = scope.borrow().get(name) {
                return Ok(v.clone());
            }
        }
        Err(RuntimeError::msg(format!("未知之名「{}」", name)))
    }

    /// `昔之…今…` — rebind the nearest existing binding, writing through
    /// shared frames so closures mutate enclosing-function locals.
    pub(super) fn assign_existing(&mut self, name: &str, val: Value) -> Result<(), RuntimeError> {
        for scope in self.env.iter().rev() {
            let mut scope = scope.borrow_mut();
            if scope.contains_key(name) {
                scope.insert(name.to_string(), val);
                return Ok(());
            }
        }
        Err(RuntimeError::msg(format!("未知之名「{}」", name)))
    }

    /// Record a produced value: sets `其` and stages the value.
    pub(super) fn produce(&mut self, val: Value) {
        self.it = val.clone();
        self.staged.push(val);
    }

    // -------------------------------------------------------------------
    // Module loading
    // -------------------------------------------------------------------

    /// Load a book once, returning its top-level bindings. Cached by
    /// canonical path; circular opens are an error.
    pub(super) fn load_module(&mut self, segments: &[String]) -> Result<Scope, RuntimeError> {
        let root = self
            .module_root
            .clone()
            .ok_or_else(|| RuntimeError::msg("未設書庫之根"))?;
        let book = segments.join("中");
        let path = find_module_file(segments, &root)
            .ok_or_else(|| RuntimeError::msg(format!("尋「{}」之書不得", book)))?;
        let key = canonicalize_path(&path).display().to_string();

        if let Some(cached) = self.module_cache.get(&key) {
            return Ok(cached.clone());
        }
        if self.loading.contains(&key) {
            return Err(RuntimeError::msg(format!("書相循環「{}」", book)));
        }

        self.loading.push(key.clone());
        let result = (|| -> Result<Scope, RuntimeError> {
            let src = std::fs::read_to_string(&path)
                .map_err(|e| RuntimeError::msg(format!("讀「{}」之書不得: {}", book, e)))?;
            let program = parse_source(&src, path.parent())
                .map_err(|e| RuntimeError::msg(format!("書「{}」有禍: {}", book, e)))?;

            // Run the book in a clean environment; only output is shared.
            let saved_env = std::mem::replace(
                &mut self.env,
                vec![Rc::new(RefCell::new(HashMap::new()))],
            );
            let saved_root = std::mem::replace(
                &mut self.module_root,
                path.parent().map(|p| p.to_path_buf()),
            );
            let saved_staged = std::mem::take(&mut self.staged);
            let saved_it = std::mem::replace(&mut self.it, Value::Unit);

            let outcome = self.run(&program);
            let exports = self
                .env
                .first()
                .map(|scope| scope.borrow().clone())
                .unwrap_or_default();

            self.env = saved_env;
            self.module_root = saved_root;
            self.staged = saved_staged;
            self.it = saved_it;

            outcome.map_err(|e| RuntimeError::msg(format!("書「{}」有禍: {}", book, e)))?;
            Ok(exports)
        })();
        self.loading.pop();

        let exports = result?;
        self.module_cache.insert(key, exports.clone());
        Ok(exports)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

/// The tag an uncaught error is reported with: its `名` field when the
/// thrown value is an error object, its repr otherwise.
fn raised_tag(err: &Value) -> String {
    if let Value::Object(fields) = err {
        if let Some((_, Value::Str(tag))) = fields
            .borrow()
            .iter()
            .find(|(key, _)| key == "名")
        {
            return tag.clone();
        }
    }
    wenyan_repr(err)
}
