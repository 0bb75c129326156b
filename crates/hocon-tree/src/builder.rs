//! Tree builder from parse events.

use std::fmt;

use hocon_parse::{Assignment, Event, ParseCallback, Token, TokenKind};

use crate::path::flatten_key;
use crate::value::{Array, Object, ObjectEntry, Tree, Value};

/// Error during tree building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Event arrived that the current builder state cannot accept.
    UnexpectedEvent(String),
    /// The event stream ended with open containers.
    UnclosedStructure,
    /// Adjacent values of different shapes cannot form one value.
    ConcatMismatch {
        /// Shape of the earlier value.
        left: &'static str,
        /// Shape of the later value.
        right: &'static str,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::UnexpectedEvent(msg) => write!(f, "unexpected event: {}", msg),
            BuildError::UnclosedStructure => write!(f, "unclosed structure"),
            BuildError::ConcatMismatch { left, right } => {
                write!(f, "cannot concatenate {} with {}", left, right)
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// Builder that assembles a [`Tree`] from parse events.
///
/// Feed it to [`hocon_parse::parse`] as the callback, then call
/// [`finish`](TreeBuilder::finish) to run post-processing (key sorting
/// and duplicate merging) and take the tree.
pub struct TreeBuilder {
    stack: Vec<Frame>,
    root: Option<Tree>,
    error: Option<BuildError>,
}

enum Frame {
    Object {
        entries: Vec<ObjectEntry>,
        next_index: usize,
        pending_key: Option<Vec<String>>,
        pending_assign: Assignment,
        pending_value: Option<Value>,
    },
    Array {
        items: Vec<Value>,
        pending_value: Option<Value>,
    },
}

impl TreeBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            root: None,
            error: None,
        }
    }

    /// The build error that made this builder refuse an event, if any.
    pub fn take_error(&mut self) -> Option<BuildError> {
        self.error.take()
    }

    /// Finish building: post-process and return the tree.
    pub fn finish(mut self) -> Result<Tree, BuildError> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        if !self.stack.is_empty() {
            return Err(BuildError::UnclosedStructure);
        }
        let mut tree = match self.root.take() {
            Some(tree) => tree,
            None => return Err(BuildError::UnexpectedEvent("empty event stream".to_string())),
        };
        match &mut tree {
            Tree::Object(obj) => obj.post_process()?,
            Tree::Array(arr) => {
                for item in &mut arr.items {
                    item.post_process()?;
                }
            }
        }
        Ok(tree)
    }

    fn handle(&mut self, event: Event) -> Result<(), BuildError> {
        match event {
            Event::ObjStart => {
                self.stack.push(Frame::Object {
                    entries: Vec::new(),
                    next_index: 0,
                    pending_key: None,
                    pending_assign: Assignment::Assign,
                    pending_value: None,
                });
                Ok(())
            }

            Event::ArrStart => {
                self.stack.push(Frame::Array {
                    items: Vec::new(),
                    pending_value: None,
                });
                Ok(())
            }

            Event::ObjEnd => {
                match self.stack.pop() {
                    Some(Frame::Object { entries, .. }) => {
                        self.attach(Value::Object(Object { entries }))
                    }
                    _ => Err(BuildError::UnexpectedEvent(
                        "object end without matching start".to_string(),
                    )),
                }
            }

            Event::ArrEnd => match self.stack.pop() {
                Some(Frame::Array { items, .. }) => self.attach(Value::Array(Array { items })),
                _ => Err(BuildError::UnexpectedEvent(
                    "array end without matching start".to_string(),
                )),
            },

            Event::KeyValStart { key, sep } => match self.stack.last_mut() {
                Some(Frame::Object {
                    pending_key,
                    pending_assign,
                    pending_value,
                    ..
                }) => {
                    *pending_key = Some(flatten_key(&key));
                    *pending_assign = sep;
                    *pending_value = None;
                    Ok(())
                }
                _ => Err(BuildError::UnexpectedEvent(
                    "key outside an object".to_string(),
                )),
            },

            Event::KeyValEnd => match self.stack.last_mut() {
                Some(Frame::Object {
                    entries,
                    next_index,
                    pending_key,
                    pending_assign,
                    pending_value,
                }) => {
                    let segments = pending_key.take().ok_or_else(|| {
                        BuildError::UnexpectedEvent("key/value end without a key".to_string())
                    })?;
                    let value = pending_value.take().unwrap_or_default();
                    let mut entry = nested_entry(segments, *pending_assign, value);
                    entry.original_index = *next_index;
                    *next_index += 1;
                    entries.push(entry);
                    Ok(())
                }
                _ => Err(BuildError::UnexpectedEvent(
                    "key/value end outside an object".to_string(),
                )),
            },

            Event::ValStart => match self.stack.last_mut() {
                Some(Frame::Array { pending_value, .. }) => {
                    *pending_value = None;
                    Ok(())
                }
                _ => Err(BuildError::UnexpectedEvent(
                    "array element outside an array".to_string(),
                )),
            },

            Event::ValEnd => match self.stack.last_mut() {
                Some(Frame::Array {
                    items,
                    pending_value,
                }) => {
                    items.push(pending_value.take().unwrap_or_default());
                    Ok(())
                }
                _ => Err(BuildError::UnexpectedEvent(
                    "array element end outside an array".to_string(),
                )),
            },

            Event::Token(tok) => self.attach(Value::Unresolved(vec![tok])),

            Event::VarSub {
                path,
                optional,
                pos,
            } => {
                let kind = if optional {
                    TokenKind::OptVar
                } else {
                    TokenKind::Var
                };
                let marker = Token::new(kind, flatten_key(&path).join("."), pos);
                self.attach(Value::Unresolved(vec![marker]))
            }
        }
    }

    /// Attach a completed value (or token run) to the pending slot of the
    /// top frame, concatenating with whatever is already pending.
    fn attach(&mut self, value: Value) -> Result<(), BuildError> {
        let slot = match self.stack.last_mut() {
            Some(Frame::Object { pending_value, .. }) => pending_value,
            Some(Frame::Array { pending_value, .. }) => pending_value,
            None => {
                // The document root is complete.
                if self.root.is_some() {
                    return Err(BuildError::UnexpectedEvent(
                        "multiple document roots".to_string(),
                    ));
                }
                self.root = Some(match value {
                    Value::Object(obj) => Tree::Object(obj),
                    Value::Array(arr) => Tree::Array(arr),
                    Value::Unresolved(_) => {
                        return Err(BuildError::UnexpectedEvent(
                            "scalar at document root".to_string(),
                        ));
                    }
                });
                return Ok(());
            }
        };
        *slot = Some(match slot.take() {
            None => value,
            Some(existing) => append_concat(existing, value)?,
        });
        Ok(())
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseCallback for TreeBuilder {
    fn event(&mut self, event: Event) -> bool {
        match self.handle(event) {
            Ok(()) => true,
            Err(err) => {
                self.error = Some(err);
                false
            }
        }
    }
}

/// Wrap a value in nested single-entry objects for a multi-segment key.
/// The innermost entry keeps the declared assignment; synthesized outer
/// entries assign.
fn nested_entry(mut segments: Vec<String>, assignment: Assignment, value: Value) -> ObjectEntry {
    let mut entry = ObjectEntry {
        key: segments.pop().unwrap_or_default(),
        original_index: 0,
        assignment,
        value,
    };
    while let Some(segment) = segments.pop() {
        let inner = Object {
            entries: vec![entry],
        };
        entry = ObjectEntry {
            key: segment,
            original_index: 0,
            assignment: Assignment::Assign,
            value: Value::Object(inner),
        };
    }
    entry
}

/// Build-time concatenation of adjacent values inside one value context.
/// Token runs append; inline object/array concatenations append their
/// entry/item lists and are collapsed by post-processing. Shapes must
/// match.
fn append_concat(lhs: Value, rhs: Value) -> Result<Value, BuildError> {
    match (lhs, rhs) {
        (Value::Unresolved(mut a), Value::Unresolved(b)) => {
            a.extend(b);
            Ok(Value::Unresolved(a))
        }
        (Value::Object(mut a), Value::Object(b)) => {
            let offset = a.entries.len();
            a.entries.extend(b.entries.into_iter().map(|mut e| {
                e.original_index += offset;
                e
            }));
            Ok(Value::Object(a))
        }
        (Value::Array(mut a), Value::Array(b)) => {
            a.items.extend(b.items);
            Ok(Value::Array(a))
        }
        (l, r) => Err(BuildError::ConcatMismatch {
            left: l.kind_name(),
            right: r.kind_name(),
        }),
    }
}
