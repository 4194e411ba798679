#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use rox::session::{Outcome, Session};

/// `Write` sink whose contents stay readable after the session takes it.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("print output is UTF-8")
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A session plus a handle on everything it prints.
pub fn capturing_session() -> (Session, SharedBuffer) {
    let buffer = SharedBuffer::default();
    (Session::with_output(buffer.clone()), buffer)
}

/// Run `source` in a fresh session, returning printed output and outcome.
pub fn run(source: &str) -> (String, Outcome) {
    let (mut session, buffer) = capturing_session();
    let outcome = session.run(source);
    (buffer.contents(), outcome)
}

/// Run `source`, asserting it completes, and return printed output.
pub fn output_of(source: &str) -> String {
    let (output, outcome) = run(source);
    assert!(
        outcome.is_success(),
        "expected success, got diagnostics: {:?}",
        outcome
            .diagnostics()
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
    );
    output
}

/// Rendered diagnostics of a run.
pub fn diagnostics_of(source: &str) -> Vec<String> {
    let (_, outcome) = run(source);
    outcome
        .diagnostics()
        .iter()
        .map(|d| d.to_string())
        .collect()
}
