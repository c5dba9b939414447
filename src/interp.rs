//! Tree-walking evaluator for the Python subset.
//!
//! Runs one call at a time against a parsed module, recording the line of
//! every executed statement. Runaway programs are cut off by a step limit
//! and a frame depth limit; every failure is a plain message for that call.

use std::collections::{BTreeSet, HashMap};

use crate::literal::Literal;
use crate::parser::ast::{BinOp, CmpOp, Expr, Handler, Module, Param, Stmt, UnaryOp};
use crate::span::{LineIndex, Spanned};

pub const MAX_STEPS: u64 = 1_000_000;
pub const MAX_DEPTH: u32 = 200;
const MAX_RANGE: i64 = 1_000_000;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Dict(Vec<(Value, Value)>),
    None,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Dict(_) => "dict",
            Value::None => "NoneType",
        }
    }

    pub fn truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Float(x) => *x != 0.0,
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) | Value::Tuple(items) => !items.is_empty(),
            Value::Dict(pairs) => !pairs.is_empty(),
            Value::None => false,
        }
    }

    /// `repr()` rendering: strings quoted, collections recursive.
    pub fn repr(&self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Float(x) => format!("{x:?}"),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            Value::Str(s) => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(Value::repr).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Tuple(items) => {
                let parts: Vec<String> = items.iter().map(Value::repr).collect();
                if items.len() == 1 {
                    format!("({},)", parts[0])
                } else {
                    format!("({})", parts.join(", "))
                }
            }
            Value::Dict(pairs) => {
                let parts: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.repr(), v.repr()))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
            Value::None => "None".to_string(),
        }
    }

    /// `str()` rendering: a bare string stays unquoted, everything else
    /// matches `repr()`.
    pub fn render(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            other => other.repr(),
        }
    }

    /// Convert a candidate argument into a runtime value. `Raw` fragments
    /// cannot cross into execution.
    pub fn from_literal(lit: &Literal) -> Result<Value, String> {
        Ok(match lit {
            Literal::Int(n) => Value::Int(*n),
            Literal::Float(x) => Value::Float(*x),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Str(s) => Value::Str(s.clone()),
            Literal::Seq(items) => Value::List(
                items.iter().map(Value::from_literal).collect::<Result<_, _>>()?,
            ),
            Literal::Tuple(items) => Value::Tuple(
                items.iter().map(Value::from_literal).collect::<Result<_, _>>()?,
            ),
            Literal::None => Value::None,
            Literal::Raw(s) => return Err(format!("unsupported argument value: {s}")),
        })
    }
}

enum Flow {
    Normal,
    Break,
    Continue,
    Return(Value),
}

type FuncRef<'a> = (&'a [Param], &'a [Spanned<Stmt>]);

pub struct Interp<'a> {
    index: &'a LineIndex,
    functions: HashMap<&'a str, FuncRef<'a>>,
    scopes: Vec<HashMap<String, Value>>,
    hits: BTreeSet<u32>,
    fuel: u64,
    depth: u32,
}

impl<'a> Interp<'a> {
    /// Register every top-level `def` in the module. The probe file holds
    /// the function source only, so nothing else runs at module scope.
    pub fn new(module: &'a Module, index: &'a LineIndex) -> Self {
        let mut functions = HashMap::new();
        for stmt in &module.body {
            if let Stmt::FuncDef { name, params, body } = &stmt.node {
                functions
                    .entry(name.node.as_str())
                    .or_insert((params.as_slice(), body.as_slice()));
            }
        }
        Self {
            index,
            functions,
            scopes: vec![HashMap::new()],
            hits: BTreeSet::new(),
            fuel: MAX_STEPS,
            depth: 0,
        }
    }

    /// Run one call with fresh fuel and a fresh scope stack, returning the
    /// outcome and the lines its statements touched.
    pub fn call(&mut self, name: &str, args: Vec<Value>) -> (Result<Value, String>, BTreeSet<u32>) {
        self.scopes = vec![HashMap::new()];
        self.hits = BTreeSet::new();
        self.fuel = MAX_STEPS;
        self.depth = 0;
        let result = self.call_function(name, args);
        (result, std::mem::take(&mut self.hits))
    }

    fn step(&mut self) -> Result<(), String> {
        if self.fuel == 0 {
            return Err("execution step limit exceeded".to_string());
        }
        self.fuel -= 1;
        Ok(())
    }

    fn call_function(&mut self, name: &str, args: Vec<Value>) -> Result<Value, String> {
        let Some(&(params, body)) = self.functions.get(name) else {
            return Err(format!("name '{name}' is not defined"));
        };
        if args.len() != params.len() {
            return Err(format!(
                "{name}() takes {} positional arguments but {} were given",
                params.len(),
                args.len()
            ));
        }
        if self.depth >= MAX_DEPTH {
            return Err("maximum recursion depth exceeded".to_string());
        }
        self.depth += 1;
        let mut frame = HashMap::new();
        for (param, arg) in params.iter().zip(args) {
            frame.insert(param.name.node.clone(), arg);
        }
        self.scopes.push(frame);
        let flow = self.exec_block(body);
        self.scopes.pop();
        self.depth -= 1;
        match flow? {
            Flow::Return(value) => Ok(value),
            Flow::Break => Err("'break' outside loop".to_string()),
            Flow::Continue => Err("'continue' outside loop".to_string()),
            Flow::Normal => Ok(Value::None),
        }
    }

    fn exec_block(&mut self, stmts: &'a [Spanned<Stmt>]) -> Result<Flow, String> {
        for stmt in stmts {
            match self.exec_stmt(stmt)? {
                Flow::Normal => {}
                other => return Ok(other),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(&mut self, stmt: &'a Spanned<Stmt>) -> Result<Flow, String> {
        self.step()?;
        self.hits.insert(self.index.line_of(stmt.span.start));
        match &stmt.node {
            Stmt::FuncDef { name, params, body } => {
                self.functions
                    .insert(name.node.as_str(), (params.as_slice(), body.as_slice()));
                Ok(Flow::Normal)
            }
            Stmt::If { cond, then_body, else_body } => {
                if self.eval(cond)?.truthy() {
                    self.exec_block(then_body)
                } else {
                    self.exec_block(else_body)
                }
            }
            Stmt::While { cond, body } => {
                loop {
                    self.step()?;
                    if !self.eval(cond)?.truthy() {
                        break;
                    }
                    match self.exec_block(body)? {
                        Flow::Break => break,
                        Flow::Continue | Flow::Normal => {}
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::For { target, iter, body } => {
                let items = self.iterate(iter)?;
                for item in items {
                    self.step()?;
                    self.set_name(&target.node, item);
                    match self.exec_block(body)? {
                        Flow::Break => break,
                        Flow::Continue | Flow::Normal => {}
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::Try { body, handlers, final_body } => {
                self.exec_try(body, handlers, final_body)
            }
            Stmt::Return(expr) => {
                let value = match expr {
                    Some(e) => self.eval(e)?,
                    None => Value::None,
                };
                Ok(Flow::Return(value))
            }
            Stmt::Raise(expr) => Err(self.raise_message(expr.as_ref())?),
            Stmt::Assign { target, value } => {
                let value = self.eval(value)?;
                self.assign(&target.node, value)?;
                Ok(Flow::Normal)
            }
            Stmt::AugAssign { target, op, value } => {
                let current = self.eval(target)?;
                let rhs = self.eval(value)?;
                let updated = eval_binary(*op, current, rhs)?;
                self.assign(&target.node, updated)?;
                Ok(Flow::Normal)
            }
            Stmt::ExprStmt(expr) => {
                self.eval(expr)?;
                Ok(Flow::Normal)
            }
            Stmt::Pass => Ok(Flow::Normal),
            Stmt::Break => Ok(Flow::Break),
            Stmt::Continue => Ok(Flow::Continue),
        }
    }

    fn exec_try(
        &mut self,
        body: &'a [Spanned<Stmt>],
        handlers: &'a [Spanned<Handler>],
        final_body: &'a [Spanned<Stmt>],
    ) -> Result<Flow, String> {
        let mut outcome = match self.exec_block(body) {
            Err(message) => {
                let mut handled = None;
                for handler in handlers {
                    if handler_matches(&handler.node, &message) {
                        if let Some(bind) = &handler.node.bind {
                            self.set_name(&bind.node, Value::Str(message.clone()));
                        }
                        handled = Some(self.exec_block(&handler.node.body));
                        break;
                    }
                }
                handled.unwrap_or(Err(message))
            }
            other => other,
        };
        if !final_body.is_empty() {
            let fin = self.exec_block(final_body)?;
            if !matches!(fin, Flow::Normal) {
                outcome = Ok(fin);
            }
        }
        outcome
    }

    /// Render a `raise` into a failure message without a real exception
    /// object: `ValueError("bad")` becomes `ValueError: bad`.
    fn raise_message(&mut self, expr: Option<&'a Spanned<Expr>>) -> Result<String, String> {
        let Some(expr) = expr else {
            return Ok("exception raised".to_string());
        };
        match &expr.node {
            Expr::Call { callee, args } => {
                if let Expr::Name(kind) = &callee.node {
                    let mut parts = Vec::new();
                    for arg in args {
                        parts.push(self.eval(arg)?.render());
                    }
                    if parts.is_empty() {
                        Ok(kind.clone())
                    } else {
                        Ok(format!("{kind}: {}", parts.join(", ")))
                    }
                } else {
                    Ok("exception raised".to_string())
                }
            }
            Expr::Name(kind) => Ok(kind.clone()),
            _ => Ok("exception raised".to_string()),
        }
    }

    fn iterate(&mut self, expr: &'a Spanned<Expr>) -> Result<Vec<Value>, String> {
        let value = self.eval(expr)?;
        match value {
            Value::List(items) | Value::Tuple(items) => Ok(items),
            Value::Str(s) => Ok(s.chars().map(|c| Value::Str(c.to_string())).collect()),
            Value::Dict(pairs) => Ok(pairs.into_iter().map(|(k, _)| k).collect()),
            other => Err(format!("'{}' object is not iterable", other.type_name())),
        }
    }

    fn assign(&mut self, target: &'a Expr, value: Value) -> Result<(), String> {
        match target {
            Expr::Name(name) => {
                self.set_name(name, value);
                Ok(())
            }
            Expr::Tuple(targets) => {
                let items = match value {
                    Value::List(items) | Value::Tuple(items) => items,
                    other => {
                        return Err(format!("cannot unpack '{}' object", other.type_name()));
                    }
                };
                if items.len() > targets.len() {
                    return Err(format!(
                        "too many values to unpack (expected {})",
                        targets.len()
                    ));
                }
                if items.len() < targets.len() {
                    return Err(format!(
                        "not enough values to unpack (expected {}, got {})",
                        targets.len(),
                        items.len()
                    ));
                }
                for (t, item) in targets.iter().zip(items) {
                    self.assign(&t.node, item)?;
                }
                Ok(())
            }
            Expr::Index { value: container, index } => {
                let idx = self.eval(index)?;
                let slot = self.lvalue_mut(&container.node)?;
                match (slot, idx) {
                    (Value::List(items), Value::Int(i)) => {
                        let len = items.len() as i64;
                        let pos = if i < 0 { i + len } else { i };
                        if pos < 0 || pos >= len {
                            return Err("list assignment index out of range".to_string());
                        }
                        items[pos as usize] = value;
                        Ok(())
                    }
                    (Value::Dict(pairs), key) => {
                        if let Some((_, slot)) = pairs.iter_mut().find(|(k, _)| py_eq(k, &key)) {
                            *slot = value;
                        } else {
                            pairs.push((key, value));
                        }
                        Ok(())
                    }
                    (slot, _) => Err(format!(
                        "'{}' object does not support item assignment",
                        slot.type_name()
                    )),
                }
            }
            _ => Err("unsupported assignment target".to_string()),
        }
    }

    /// Mutable access to a `Name` or a chain of index steps rooted at one.
    fn lvalue_mut(&mut self, expr: &'a Expr) -> Result<&mut Value, String> {
        match expr {
            Expr::Name(name) => {
                let local = self
                    .scopes
                    .last()
                    .is_some_and(|scope| scope.contains_key(name));
                let slot = if local {
                    self.scopes.last_mut().and_then(|scope| scope.get_mut(name))
                } else {
                    self.scopes.first_mut().and_then(|scope| scope.get_mut(name))
                };
                slot.ok_or_else(|| format!("name '{name}' is not defined"))
            }
            Expr::Index { value, index } => {
                let idx = self.eval(index)?;
                let container = self.lvalue_mut(&value.node)?;
                match (container, idx) {
                    (Value::List(items), Value::Int(i)) => {
                        let len = items.len() as i64;
                        let pos = if i < 0 { i + len } else { i };
                        items
                            .get_mut(pos as usize)
                            .ok_or_else(|| "list index out of range".to_string())
                    }
                    (Value::Dict(pairs), key) => pairs
                        .iter_mut()
                        .find(|(k, _)| py_eq(k, &key))
                        .map(|(_, v)| v)
                        .ok_or_else(|| format!("KeyError: {}", key.repr())),
                    (container, _) => Err(format!(
                        "'{}' object is not subscriptable",
                        container.type_name()
                    )),
                }
            }
            _ => Err("unsupported assignment target".to_string()),
        }
    }

    fn set_name(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    fn lookup(&self, name: &str) -> Result<Value, String> {
        if let Some(value) = self.scopes.last().and_then(|scope| scope.get(name)) {
            return Ok(value.clone());
        }
        if let Some(value) = self.scopes.first().and_then(|scope| scope.get(name)) {
            return Ok(value.clone());
        }
        Err(format!("name '{name}' is not defined"))
    }

    fn eval(&mut self, expr: &'a Spanned<Expr>) -> Result<Value, String> {
        self.step()?;
        match &expr.node {
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Float(x) => Ok(Value::Float(*x)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::NoneLit => Ok(Value::None),
            Expr::Name(name) => self.lookup(name),
            Expr::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.eval(item)?);
                }
                Ok(Value::List(out))
            }
            Expr::Tuple(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.eval(item)?);
                }
                Ok(Value::Tuple(out))
            }
            Expr::Dict(pairs) => {
                let mut out = Vec::with_capacity(pairs.len());
                for (k, v) in pairs {
                    let key = self.eval(k)?;
                    let value = self.eval(v)?;
                    if let Some((_, slot)) = out.iter_mut().find(|(existing, _)| py_eq(existing, &key)) {
                        *slot = value;
                    } else {
                        out.push((key, value));
                    }
                }
                Ok(Value::Dict(out))
            }
            Expr::Unary { op, operand } => {
                let value = self.eval(operand)?;
                eval_unary(*op, value)
            }
            Expr::Binary { op: BinOp::And, left, right } => {
                let lhs = self.eval(left)?;
                if lhs.truthy() { self.eval(right) } else { Ok(lhs) }
            }
            Expr::Binary { op: BinOp::Or, left, right } => {
                let lhs = self.eval(left)?;
                if lhs.truthy() { Ok(lhs) } else { self.eval(right) }
            }
            Expr::Binary { op, left, right } => {
                let lhs = self.eval(left)?;
                let rhs = self.eval(right)?;
                eval_binary(*op, lhs, rhs)
            }
            Expr::Compare { left, rest } => {
                let mut prev = self.eval(left)?;
                for (op, rhs) in rest {
                    let next = self.eval(rhs)?;
                    if !compare(*op, &prev, &next)? {
                        return Ok(Value::Bool(false));
                    }
                    prev = next;
                }
                Ok(Value::Bool(true))
            }
            Expr::Call { callee, args } => self.eval_call(callee, args),
            Expr::Attribute { value, attr } => {
                let object = self.eval(value)?;
                Err(format!(
                    "'{}' object has no attribute '{}'",
                    object.type_name(),
                    attr.node
                ))
            }
            Expr::Index { value, index } => {
                let object = self.eval(value)?;
                let idx = self.eval(index)?;
                index_value(&object, &idx)
            }
            Expr::Slice { value, lower, upper, step } => {
                let object = self.eval(value)?;
                let lower = self.eval_slice_bound(lower.as_deref())?;
                let upper = self.eval_slice_bound(upper.as_deref())?;
                let step = match self.eval_slice_bound(step.as_deref())? {
                    Some(0) => return Err("slice step cannot be zero".to_string()),
                    Some(s) => s,
                    None => 1,
                };
                slice_value(&object, lower, upper, step)
            }
        }
    }

    fn eval_slice_bound(
        &mut self,
        bound: Option<&'a Spanned<Expr>>,
    ) -> Result<Option<i64>, String> {
        match bound {
            None => Ok(None),
            Some(expr) => match self.eval(expr)? {
                Value::Int(n) => Ok(Some(n)),
                Value::Bool(b) => Ok(Some(b as i64)),
                other => Err(format!(
                    "slice indices must be integers, not '{}'",
                    other.type_name()
                )),
            },
        }
    }

    fn eval_call(
        &mut self,
        callee: &'a Spanned<Expr>,
        args: &'a [Spanned<Expr>],
    ) -> Result<Value, String> {
        match &callee.node {
            Expr::Name(name) => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(arg)?);
                }
                if self.functions.contains_key(name.as_str()) {
                    return self.call_function(name, values);
                }
                self.call_builtin(name, values)
            }
            Expr::Attribute { value, attr } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(arg)?);
                }
                self.call_method(value, &attr.node, values)
            }
            _ => {
                let value = self.eval(callee)?;
                Err(format!("'{}' object is not callable", value.type_name()))
            }
        }
    }

    /// Dispatch a method call. When the receiver is a name or an index
    /// chain the stored value is mutated in place; otherwise the method
    /// runs on a temporary, as Python would.
    fn call_method(
        &mut self,
        object: &'a Spanned<Expr>,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, String> {
        if is_lvalue_chain(&object.node) {
            let slot = self.lvalue_mut(&object.node)?;
            let mut taken = std::mem::replace(slot, Value::None);
            let result = call_method_on(&mut taken, method, args);
            let slot = self.lvalue_mut(&object.node)?;
            *slot = taken;
            result
        } else {
            let mut value = self.eval(object)?;
            call_method_on(&mut value, method, args)
        }
    }

    fn call_builtin(&mut self, name: &str, mut args: Vec<Value>) -> Result<Value, String> {
        match (name, args.len()) {
            ("len", 1) => match &args[0] {
                Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
                Value::List(items) | Value::Tuple(items) => Ok(Value::Int(items.len() as i64)),
                Value::Dict(pairs) => Ok(Value::Int(pairs.len() as i64)),
                other => Err(format!("object of type '{}' has no len()", other.type_name())),
            },
            ("range", 1..=3) => {
                let mut bounds = Vec::with_capacity(args.len());
                for arg in &args {
                    match arg {
                        Value::Int(n) => bounds.push(*n),
                        Value::Bool(b) => bounds.push(*b as i64),
                        other => {
                            return Err(format!(
                                "'{}' object cannot be interpreted as an integer",
                                other.type_name()
                            ));
                        }
                    }
                }
                let (start, stop, step) = match bounds.as_slice() {
                    [stop] => (0, *stop, 1),
                    [start, stop] => (*start, *stop, 1),
                    [start, stop, step] => (*start, *stop, *step),
                    _ => unreachable!(),
                };
                if step == 0 {
                    return Err("range() arg 3 must not be zero".to_string());
                }
                let mut items = Vec::new();
                let mut i = start;
                while (step > 0 && i < stop) || (step < 0 && i > stop) {
                    items.push(Value::Int(i));
                    if items.len() as i64 > MAX_RANGE {
                        return Err("range result too large".to_string());
                    }
                    i += step;
                }
                Ok(Value::List(items))
            }
            ("abs", 1) => match &args[0] {
                Value::Int(n) => n
                    .checked_abs()
                    .map(Value::Int)
                    .ok_or_else(|| "integer overflow".to_string()),
                Value::Float(x) => Ok(Value::Float(x.abs())),
                Value::Bool(b) => Ok(Value::Int(*b as i64)),
                other => Err(format!("bad operand type for abs(): '{}'", other.type_name())),
            },
            ("min", 1..) | ("max", 1..) => {
                let take_max = name == "max";
                let items = if args.len() == 1 {
                    match args.pop() {
                        Some(Value::List(items)) | Some(Value::Tuple(items)) => items,
                        Some(Value::Str(s)) => {
                            s.chars().map(|c| Value::Str(c.to_string())).collect()
                        }
                        Some(other) => {
                            return Err(format!(
                                "'{}' object is not iterable",
                                other.type_name()
                            ));
                        }
                        None => unreachable!(),
                    }
                } else {
                    args
                };
                let mut iter = items.into_iter();
                let Some(mut best) = iter.next() else {
                    return Err(format!("{name}() arg is an empty sequence"));
                };
                for item in iter {
                    let replace = if take_max {
                        compare(CmpOp::Gt, &item, &best)?
                    } else {
                        compare(CmpOp::Lt, &item, &best)?
                    };
                    if replace {
                        best = item;
                    }
                }
                Ok(best)
            }
            ("sum", 1) => {
                let items = match args.pop() {
                    Some(Value::List(items)) | Some(Value::Tuple(items)) => items,
                    Some(other) => {
                        return Err(format!("'{}' object is not iterable", other.type_name()));
                    }
                    None => unreachable!(),
                };
                let mut total = Value::Int(0);
                for item in items {
                    total = eval_binary(BinOp::Add, total, item)?;
                }
                Ok(total)
            }
            ("sorted", 1) => {
                let mut items = match args.pop() {
                    Some(Value::List(items)) | Some(Value::Tuple(items)) => items,
                    Some(Value::Str(s)) => s.chars().map(|c| Value::Str(c.to_string())).collect(),
                    Some(other) => {
                        return Err(format!("'{}' object is not iterable", other.type_name()));
                    }
                    None => unreachable!(),
                };
                sort_values(&mut items)?;
                Ok(Value::List(items))
            }
            // Output is swallowed; the probe reports return values, not stdout.
            ("print", _) => Ok(Value::None),
            ("str", 0) => Ok(Value::Str(String::new())),
            ("str", 1) => Ok(Value::Str(args[0].render())),
            ("int", 0) => Ok(Value::Int(0)),
            ("int", 1) => match &args[0] {
                Value::Int(n) => Ok(Value::Int(*n)),
                Value::Float(x) => Ok(Value::Int(*x as i64)),
                Value::Bool(b) => Ok(Value::Int(*b as i64)),
                Value::Str(s) => s.trim().parse::<i64>().map(Value::Int).map_err(|_| {
                    format!("invalid literal for int() with base 10: '{}'", s.trim())
                }),
                other => Err(format!(
                    "int() argument must be a string or a number, not '{}'",
                    other.type_name()
                )),
            },
            ("float", 0) => Ok(Value::Float(0.0)),
            ("float", 1) => match &args[0] {
                Value::Int(n) => Ok(Value::Float(*n as f64)),
                Value::Float(x) => Ok(Value::Float(*x)),
                Value::Bool(b) => Ok(Value::Float(*b as i64 as f64)),
                Value::Str(s) => s
                    .trim()
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|_| format!("could not convert string to float: '{}'", s.trim())),
                other => Err(format!(
                    "float() argument must be a string or a number, not '{}'",
                    other.type_name()
                )),
            },
            ("bool", 0) => Ok(Value::Bool(false)),
            ("bool", 1) => Ok(Value::Bool(args[0].truthy())),
            ("len" | "abs" | "sum" | "sorted" | "str" | "int" | "float" | "bool", n) => {
                Err(format!("{name}() takes one argument ({n} given)"))
            }
            ("range", n) => Err(format!("range() takes 1 to 3 arguments ({n} given)")),
            ("min" | "max", 0) => Err(format!("{name}() expected at least 1 argument")),
            _ => Err(format!("name '{name}' is not defined")),
        }
    }
}

fn is_lvalue_chain(expr: &Expr) -> bool {
    match expr {
        Expr::Name(_) => true,
        Expr::Index { value, .. } => is_lvalue_chain(&value.node),
        _ => false,
    }
}

fn handler_matches(handler: &Handler, message: &str) -> bool {
    match &handler.kind {
        None => true,
        Some(kind) => kind.node == "Exception" || message.starts_with(kind.node.as_str()),
    }
}

enum Num {
    Int(i64),
    Float(f64),
}

fn numeric(value: &Value) -> Option<Num> {
    match value {
        Value::Int(n) => Some(Num::Int(*n)),
        Value::Float(x) => Some(Num::Float(*x)),
        Value::Bool(b) => Some(Num::Int(*b as i64)),
        _ => None,
    }
}

fn as_f64(num: &Num) -> f64 {
    match num {
        Num::Int(n) => *n as f64,
        Num::Float(x) => *x,
    }
}

fn floor_div_i64(a: i64, b: i64) -> i64 {
    let q = a / b;
    if a % b != 0 && (a < 0) != (b < 0) { q - 1 } else { q }
}

fn mod_i64(a: i64, b: i64) -> i64 {
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) { r + b } else { r }
}

fn eval_unary(op: UnaryOp, value: Value) -> Result<Value, String> {
    match op {
        UnaryOp::Not => Ok(Value::Bool(!value.truthy())),
        UnaryOp::Neg => match numeric(&value) {
            Some(Num::Int(n)) => n
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| "integer overflow".to_string()),
            Some(Num::Float(x)) => Ok(Value::Float(-x)),
            None => Err(format!("bad operand type for unary -: '{}'", value.type_name())),
        },
        UnaryOp::Pos => match numeric(&value) {
            Some(Num::Int(n)) => Ok(Value::Int(n)),
            Some(Num::Float(x)) => Ok(Value::Float(x)),
            None => Err(format!("bad operand type for unary +: '{}'", value.type_name())),
        },
    }
}

fn eval_binary(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, String> {
    if let (Some(a), Some(b)) = (numeric(&lhs), numeric(&rhs)) {
        return numeric_binary(op, a, b);
    }
    match (op, lhs, rhs) {
        (BinOp::Add, Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
        (BinOp::Add, Value::List(mut a), Value::List(b)) => {
            a.extend(b);
            Ok(Value::List(a))
        }
        (BinOp::Add, Value::Tuple(mut a), Value::Tuple(b)) => {
            a.extend(b);
            Ok(Value::Tuple(a))
        }
        (BinOp::Mul, Value::Str(s), Value::Int(n)) | (BinOp::Mul, Value::Int(n), Value::Str(s)) => {
            Ok(Value::Str(s.repeat(n.max(0) as usize)))
        }
        (BinOp::Mul, Value::List(items), Value::Int(n))
        | (BinOp::Mul, Value::Int(n), Value::List(items)) => {
            Ok(Value::List(repeat_items(items, n)))
        }
        (BinOp::Mul, Value::Tuple(items), Value::Int(n))
        | (BinOp::Mul, Value::Int(n), Value::Tuple(items)) => {
            Ok(Value::Tuple(repeat_items(items, n)))
        }
        (op, lhs, rhs) => Err(format!(
            "unsupported operand type(s) for {}: '{}' and '{}'",
            op.symbol(),
            lhs.type_name(),
            rhs.type_name()
        )),
    }
}

fn repeat_items(items: Vec<Value>, n: i64) -> Vec<Value> {
    let mut out = Vec::new();
    for _ in 0..n.max(0) {
        out.extend(items.iter().cloned());
    }
    out
}

fn numeric_binary(op: BinOp, a: Num, b: Num) -> Result<Value, String> {
    use Num::Int;
    match op {
        BinOp::Add => match (a, b) {
            (Int(x), Int(y)) => x
                .checked_add(y)
                .map(Value::Int)
                .ok_or_else(|| "integer overflow".to_string()),
            (a, b) => Ok(Value::Float(as_f64(&a) + as_f64(&b))),
        },
        BinOp::Sub => match (a, b) {
            (Int(x), Int(y)) => x
                .checked_sub(y)
                .map(Value::Int)
                .ok_or_else(|| "integer overflow".to_string()),
            (a, b) => Ok(Value::Float(as_f64(&a) - as_f64(&b))),
        },
        BinOp::Mul => match (a, b) {
            (Int(x), Int(y)) => x
                .checked_mul(y)
                .map(Value::Int)
                .ok_or_else(|| "integer overflow".to_string()),
            (a, b) => Ok(Value::Float(as_f64(&a) * as_f64(&b))),
        },
        BinOp::Div => {
            let denom = as_f64(&b);
            if denom == 0.0 {
                return Err("division by zero".to_string());
            }
            Ok(Value::Float(as_f64(&a) / denom))
        }
        BinOp::FloorDiv => match (a, b) {
            (_, Int(0)) => Err("division by zero".to_string()),
            (Int(x), Int(y)) => Ok(Value::Int(floor_div_i64(x, y))),
            (a, b) => {
                let denom = as_f64(&b);
                if denom == 0.0 {
                    return Err("division by zero".to_string());
                }
                Ok(Value::Float((as_f64(&a) / denom).floor()))
            }
        },
        BinOp::Mod => match (a, b) {
            (_, Int(0)) => Err("modulo by zero".to_string()),
            (Int(x), Int(y)) => Ok(Value::Int(mod_i64(x, y))),
            (a, b) => {
                let denom = as_f64(&b);
                if denom == 0.0 {
                    return Err("modulo by zero".to_string());
                }
                let x = as_f64(&a);
                Ok(Value::Float(x - denom * (x / denom).floor()))
            }
        },
        BinOp::Pow => match (a, b) {
            (Int(x), Int(y)) if y >= 0 => {
                let exp = u32::try_from(y).map_err(|_| "integer overflow".to_string())?;
                x.checked_pow(exp)
                    .map(Value::Int)
                    .ok_or_else(|| "integer overflow".to_string())
            }
            (a, b) => Ok(Value::Float(as_f64(&a).powf(as_f64(&b)))),
        },
        BinOp::And | BinOp::Or => unreachable!("short-circuit ops are handled during eval"),
    }
}

pub(crate) fn py_eq(a: &Value, b: &Value) -> bool {
    if let (Some(x), Some(y)) = (numeric(a), numeric(b)) {
        return as_f64(&x) == as_f64(&y);
    }
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::List(x), Value::List(y)) | (Value::Tuple(x), Value::Tuple(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(i, j)| py_eq(i, j))
        }
        (Value::Dict(x), Value::Dict(y)) => {
            x.len() == y.len()
                && x.iter().all(|(k, v)| {
                    y.iter().any(|(k2, v2)| py_eq(k, k2) && py_eq(v, v2))
                })
        }
        (Value::None, Value::None) => true,
        _ => false,
    }
}

fn ordering(op: CmpOp, a: &Value, b: &Value) -> Result<std::cmp::Ordering, String> {
    use std::cmp::Ordering;
    if let (Some(x), Some(y)) = (numeric(a), numeric(b)) {
        return as_f64(&x)
            .partial_cmp(&as_f64(&y))
            .ok_or_else(|| "cannot order nan values".to_string());
    }
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => Ok(x.cmp(y)),
        (Value::List(x), Value::List(y)) | (Value::Tuple(x), Value::Tuple(y)) => {
            for (i, j) in x.iter().zip(y.iter()) {
                match ordering(op, i, j)? {
                    Ordering::Equal => {}
                    other => return Ok(other),
                }
            }
            Ok(x.len().cmp(&y.len()))
        }
        _ => Err(format!(
            "'{}' not supported between instances of '{}' and '{}'",
            op.symbol(),
            a.type_name(),
            b.type_name()
        )),
    }
}

fn compare(op: CmpOp, a: &Value, b: &Value) -> Result<bool, String> {
    use std::cmp::Ordering;
    match op {
        CmpOp::Eq => Ok(py_eq(a, b)),
        CmpOp::Ne => Ok(!py_eq(a, b)),
        CmpOp::Is => Ok(py_eq(a, b)),
        CmpOp::IsNot => Ok(!py_eq(a, b)),
        CmpOp::Lt => Ok(ordering(op, a, b)? == Ordering::Less),
        CmpOp::Le => Ok(ordering(op, a, b)? != Ordering::Greater),
        CmpOp::Gt => Ok(ordering(op, a, b)? == Ordering::Greater),
        CmpOp::Ge => Ok(ordering(op, a, b)? != Ordering::Less),
        CmpOp::In => contains(b, a),
        CmpOp::NotIn => contains(b, a).map(|found| !found),
    }
}

fn contains(container: &Value, item: &Value) -> Result<bool, String> {
    match container {
        Value::Str(haystack) => match item {
            Value::Str(needle) => Ok(haystack.contains(needle.as_str())),
            other => Err(format!(
                "'in <string>' requires string as left operand, not '{}'",
                other.type_name()
            )),
        },
        Value::List(items) | Value::Tuple(items) => {
            Ok(items.iter().any(|v| py_eq(v, item)))
        }
        Value::Dict(pairs) => Ok(pairs.iter().any(|(k, _)| py_eq(k, item))),
        other => Err(format!(
            "argument of type '{}' is not iterable",
            other.type_name()
        )),
    }
}

fn sort_values(items: &mut [Value]) -> Result<(), String> {
    let mut error = None;
    items.sort_by(|a, b| match ordering(CmpOp::Lt, a, b) {
        Ok(ord) => ord,
        Err(e) => {
            error.get_or_insert(e);
            std::cmp::Ordering::Equal
        }
    });
    match error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn index_value(object: &Value, idx: &Value) -> Result<Value, String> {
    match object {
        Value::List(items) | Value::Tuple(items) => match idx {
            Value::Int(i) => {
                let len = items.len() as i64;
                let pos = if *i < 0 { i + len } else { *i };
                if pos < 0 || pos >= len {
                    return Err(format!("{} index out of range", object.type_name()));
                }
                Ok(items[pos as usize].clone())
            }
            other => Err(format!(
                "{} indices must be integers, not '{}'",
                object.type_name(),
                other.type_name()
            )),
        },
        Value::Str(s) => match idx {
            Value::Int(i) => {
                let chars: Vec<char> = s.chars().collect();
                let len = chars.len() as i64;
                let pos = if *i < 0 { i + len } else { *i };
                if pos < 0 || pos >= len {
                    return Err("string index out of range".to_string());
                }
                Ok(Value::Str(chars[pos as usize].to_string()))
            }
            other => Err(format!(
                "string indices must be integers, not '{}'",
                other.type_name()
            )),
        },
        Value::Dict(pairs) => pairs
            .iter()
            .find(|(k, _)| py_eq(k, idx))
            .map(|(_, v)| v.clone())
            .ok_or_else(|| format!("KeyError: {}", idx.repr())),
        other => Err(format!("'{}' object is not subscriptable", other.type_name())),
    }
}

fn slice_value(
    object: &Value,
    lower: Option<i64>,
    upper: Option<i64>,
    step: i64,
) -> Result<Value, String> {
    match object {
        Value::List(items) => {
            let picked = slice_indices(items.len() as i64, lower, upper, step);
            Ok(Value::List(
                picked.iter().map(|&i| items[i as usize].clone()).collect(),
            ))
        }
        Value::Tuple(items) => {
            let picked = slice_indices(items.len() as i64, lower, upper, step);
            Ok(Value::Tuple(
                picked.iter().map(|&i| items[i as usize].clone()).collect(),
            ))
        }
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            let picked = slice_indices(chars.len() as i64, lower, upper, step);
            Ok(Value::Str(picked.iter().map(|&i| chars[i as usize]).collect()))
        }
        other => Err(format!("'{}' object is not subscriptable", other.type_name())),
    }
}

fn slice_indices(len: i64, lower: Option<i64>, upper: Option<i64>, step: i64) -> Vec<i64> {
    let norm = |i: i64| if i < 0 { i + len } else { i };
    let mut out = Vec::new();
    if step > 0 {
        let start = lower.map(norm).unwrap_or(0).clamp(0, len);
        let stop = upper.map(norm).unwrap_or(len).clamp(0, len);
        let mut i = start;
        while i < stop {
            out.push(i);
            i += step;
        }
    } else {
        let start = lower.map(norm).unwrap_or(len - 1).clamp(-1, len - 1);
        let stop = upper.map(norm).unwrap_or(-1).max(-1);
        let mut i = start;
        while i > stop && i >= 0 {
            out.push(i);
            i += step;
        }
    }
    out
}

fn call_method_on(object: &mut Value, method: &str, mut args: Vec<Value>) -> Result<Value, String> {
    match object {
        Value::List(items) => match (method, args.len()) {
            ("append", 1) => {
                items.push(args.remove(0));
                Ok(Value::None)
            }
            ("pop", 0) => items
                .pop()
                .ok_or_else(|| "pop from empty list".to_string()),
            ("pop", 1) => match args[0] {
                Value::Int(i) => {
                    let len = items.len() as i64;
                    let pos = if i < 0 { i + len } else { i };
                    if pos < 0 || pos >= len {
                        return Err("pop index out of range".to_string());
                    }
                    Ok(items.remove(pos as usize))
                }
                _ => Err("list.pop index must be an integer".to_string()),
            },
            ("sort", 0) => {
                sort_values(items)?;
                Ok(Value::None)
            }
            ("reverse", 0) => {
                items.reverse();
                Ok(Value::None)
            }
            ("count", 1) => {
                let n = items.iter().filter(|v| py_eq(v, &args[0])).count();
                Ok(Value::Int(n as i64))
            }
            ("index", 1) => items
                .iter()
                .position(|v| py_eq(v, &args[0]))
                .map(|i| Value::Int(i as i64))
                .ok_or_else(|| format!("{} is not in list", args[0].repr())),
            _ => Err(format!("'list' object has no attribute '{method}'")),
        },
        Value::Str(s) => match (method, args.len()) {
            ("upper", 0) => Ok(Value::Str(s.to_uppercase())),
            ("lower", 0) => Ok(Value::Str(s.to_lowercase())),
            ("strip", 0) => Ok(Value::Str(s.trim().to_string())),
            ("split", 0) => Ok(Value::List(
                s.split_whitespace()
                    .map(|part| Value::Str(part.to_string()))
                    .collect(),
            )),
            ("split", 1) => match &args[0] {
                Value::Str(sep) if !sep.is_empty() => Ok(Value::List(
                    s.split(sep.as_str())
                        .map(|part| Value::Str(part.to_string()))
                        .collect(),
                )),
                Value::Str(_) => Err("empty separator".to_string()),
                other => Err(format!("must be str, not '{}'", other.type_name())),
            },
            ("join", 1) => {
                let items = match args.remove(0) {
                    Value::List(items) | Value::Tuple(items) => items,
                    other => {
                        return Err(format!("can only join an iterable, not '{}'", other.type_name()));
                    }
                };
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Str(part) => parts.push(part),
                        other => {
                            return Err(format!(
                                "sequence item: expected str instance, '{}' found",
                                other.type_name()
                            ));
                        }
                    }
                }
                Ok(Value::Str(parts.join(s)))
            }
            ("startswith", 1) => match &args[0] {
                Value::Str(prefix) => Ok(Value::Bool(s.starts_with(prefix.as_str()))),
                other => Err(format!("must be str, not '{}'", other.type_name())),
            },
            ("endswith", 1) => match &args[0] {
                Value::Str(suffix) => Ok(Value::Bool(s.ends_with(suffix.as_str()))),
                other => Err(format!("must be str, not '{}'", other.type_name())),
            },
            ("replace", 2) => match (&args[0], &args[1]) {
                (Value::Str(from), Value::Str(to)) => {
                    Ok(Value::Str(s.replace(from.as_str(), to.as_str())))
                }
                _ => Err("replace arguments must be strings".to_string()),
            },
            _ => Err(format!("'str' object has no attribute '{method}'")),
        },
        other => Err(format!(
            "'{}' object has no attribute '{method}'",
            other.type_name()
        )),
    }
}
