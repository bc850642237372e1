//! Name → action table behind the console prompt.
//!
//! Actions are generic over the context they run against so the registry
//! can be exercised on its own; the console instantiates it with itself.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::rc::Rc;

/// Error an action reports back to the console.
pub type ActionError = Box<dyn Error>;
pub type ActionResult = Result<(), ActionError>;
pub type Action<C> = Rc<dyn Fn(&mut C) -> ActionResult>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ran,
    Unknown,
}

struct Entry<C> {
    name: String,
    action: Action<C>,
}

pub struct CommandRegistry<C> {
    entries: Vec<Entry<C>>,
    index: HashMap<String, usize>,
}

impl<C> Default for CommandRegistry<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<C> fmt::Debug for CommandRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("names", &self.list_names())
            .finish()
    }
}

impl<C> CommandRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `action` under `name`. Re-registering a name replaces the action
    /// but keeps the name where it was in the listing.
    pub fn register<F>(&mut self, name: impl Into<String>, action: F)
    where
        F: Fn(&mut C) -> ActionResult + 'static,
    {
        self.register_rc(name, Rc::new(action));
    }

    pub fn register_rc(&mut self, name: impl Into<String>, action: Action<C>) {
        let name = name.into();
        match self.index.get(&name) {
            Some(&idx) => {
                if let Some(entry) = self.entries.get_mut(idx) {
                    entry.action = action;
                }
            }
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push(Entry { name, action });
            }
        }
    }

    /// Clone out the handle registered under `name`.
    pub fn resolve(&self, name: &str) -> Option<Action<C>> {
        self.index
            .get(name)
            .and_then(|&idx| self.entries.get(idx))
            .map(|entry| Rc::clone(&entry.action))
    }

    /// Run `name` against `ctx`. A miss is `Ok(Outcome::Unknown)`; an error
    /// from the action itself is passed through.
    pub fn execute(&self, name: &str, ctx: &mut C) -> Result<Outcome, ActionError> {
        match self.resolve(name) {
            Some(action) => {
                action(ctx)?;
                Ok(Outcome::Ran)
            }
            None => Ok(Outcome::Unknown),
        }
    }

    /// Registered names in registration order.
    pub fn list_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
