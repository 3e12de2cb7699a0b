use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::input::ByteInput;
use crate::router::Connection;
use crate::session::ObjectReader;

pub fn arbitrary_value<T>() -> T
where
    T: for<'x> ::arbitrary::Arbitrary<'x>,
{
    <T as ::arbitrary::Arbitrary>::arbitrary_take_rest(::arbitrary::Unstructured::new(
        &Vec::from_iter(std::iter::repeat_with(::rand::random::<u8>).take(1024)),
    ))
    .unwrap_or_else(|e| {
        panic!(
            "failed to generate arbitrary value of type {}: {e}",
            std::any::type_name::<T>()
        )
    })
}

/// Split `bytes` into random non-empty chunks of at most `max` bytes.
pub fn random_chunks(bytes: &[u8], max: usize) -> Vec<&[u8]> {
    use ::rand::Rng;

    let mut rng = ::rand::thread_rng();
    let mut chunks = Vec::new();
    let mut rest = bytes;
    while !rest.is_empty() {
        let n = rng.gen_range(1..=rest.len().min(max));
        let (head, tail) = rest.split_at(n);
        chunks.push(head);
        rest = tail;
    }
    chunks
}

#[derive(
    Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize, ::arbitrary::Arbitrary,
)]
pub enum Event {
    Ping,
    Text(String),
    Move { x: i32, y: i32 },
    Blob(#[serde(with = "serde_bytes")] Vec<u8>),
    Batch(Vec<u16>, bool),
}

#[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
pub struct Payload {
    pub id: u64,
    #[serde(with = "serde_bytes")]
    pub body: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct RecordingConnection {
    pub closes: usize,
}

impl Connection for RecordingConnection {
    fn close(&mut self) {
        self.closes += 1;
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Calls {
    pub created: usize,
    pub started: usize,
    pub read: usize,
    pub finished: usize,
    pub closed: usize,
}

/// What a [`ScriptedReader`] does with its input.
#[derive(Debug, Clone, Copy)]
pub enum Script {
    /// Read an object of exactly this many bytes.
    Fixed(usize),
    /// Read this many bytes, then reject them as malformed.
    Reject(usize),
    /// Like `Fixed`, but closing fails.
    FailClose(usize),
}

pub struct ScriptedReader {
    script: Script,
    calls: Rc<RefCell<Calls>>,
}

impl ObjectReader for ScriptedReader {
    type Item = Vec<u8>;

    fn start(&mut self, _: &mut dyn ByteInput) -> Result<()> {
        self.calls.borrow_mut().started += 1;
        Ok(())
    }

    fn read_object(&mut self, input: &mut dyn ByteInput) -> Result<Vec<u8>> {
        self.calls.borrow_mut().read += 1;
        match self.script {
            Script::Fixed(len) | Script::FailClose(len) => Ok(input.read_vec(len)?),
            Script::Reject(len) => {
                input.read_vec(len)?;
                Err(Error::Invalid("scripted payload".into()))
            }
        }
    }

    fn finish(&mut self, _: &mut dyn ByteInput) -> Result<()> {
        self.calls.borrow_mut().finished += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.calls.borrow_mut().closed += 1;
        match self.script {
            Script::FailClose(_) => Err(Error::Generic("scripted close failure".into())),
            _ => Ok(()),
        }
    }
}

pub fn scripted_provider(
    script: Script,
    calls: Rc<RefCell<Calls>>,
) -> impl Fn(&RecordingConnection) -> Result<ScriptedReader> {
    move |_: &RecordingConnection| {
        calls.borrow_mut().created += 1;
        Ok(ScriptedReader {
            script,
            calls: calls.clone(),
        })
    }
}
