use std::cell::RefCell;
use std::io::{Result as IoResult, Write};
use std::rc::Rc;

use crate::executor::{snapshot_env, Executor};
use crate::types::EnvMap;

mod conditional_tests;

/// In-memory stream shared between the executor and the test.
#[derive(Clone, Default)]
pub struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.0.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}

pub fn shell_with_env(env: EnvMap) -> (Executor, SharedBuf, SharedBuf) {
    let out = SharedBuf::default();
    let err = SharedBuf::default();
    let executor = Executor::with_streams(env, Box::new(out.clone()), Box::new(err.clone()));
    (executor, out, err)
}

pub fn shell() -> (Executor, SharedBuf, SharedBuf) {
    shell_with_env(snapshot_env())
}
