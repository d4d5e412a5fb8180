//! Scene graph scenario tests
//!
//! Recording scripts push one line per hook into a shared log so each test
//! can assert the exact hook sequence.

mod collision;
mod ordering;

use std::cell::RefCell;
use std::rc::Rc;

use crate::scene::{ComponentContext, EntityContext, EntityScript, Script};

pub(super) type Log = Rc<RefCell<Vec<String>>>;

pub(super) fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

/// Component script recording every hook
pub(super) struct Recorder {
    pub name: &'static str,
    pub log: Log,
}

impl Recorder {
    pub fn new(name: &'static str, log: &Log) -> Self {
        Self { name, log: log.clone() }
    }

    fn record(&self, hook: &str) {
        self.log.borrow_mut().push(format!("{} {}", self.name, hook));
    }
}

impl Script for Recorder {
    fn attached(&mut self, _ctx: &mut ComponentContext<'_>) {
        self.record("attached");
    }

    fn detached(&mut self, _ctx: &mut ComponentContext<'_>) {
        self.record("detached");
    }

    fn update(&mut self, _ctx: &mut ComponentContext<'_>) {
        self.record("update");
    }
}

/// Entity script recording every hook
pub(super) struct Tracker {
    pub name: &'static str,
    pub log: Log,
}

impl Tracker {
    pub fn new(name: &'static str, log: &Log) -> Self {
        Self { name, log: log.clone() }
    }

    fn record(&self, hook: &str) {
        self.log.borrow_mut().push(format!("{} {}", self.name, hook));
    }
}

impl EntityScript for Tracker {
    fn added(&mut self, _ctx: &mut EntityContext<'_>) {
        self.record("added");
    }

    fn removed(&mut self, _ctx: &mut EntityContext<'_>) {
        self.record("removed");
    }

    fn update_first(&mut self, _ctx: &mut EntityContext<'_>) {
        self.record("first");
    }

    fn update(&mut self, _ctx: &mut EntityContext<'_>) {
        self.record("update");
    }

    fn update_last(&mut self, _ctx: &mut EntityContext<'_>) {
        self.record("last");
    }
}
