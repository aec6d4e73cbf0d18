//! Provenance records attached to type nodes
//!
//! A [`Location`] is an append-only sequence of [`Frame`]s: the call sites at
//! which a type was observed. Locations are diagnostic metadata only and are
//! never consulted by equality or subtyping.

use std::fmt;

/// A single call-stack slice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub file: String,
    pub line: u32,
    pub function: String,
    pub source_text: String,
}

impl Frame {
    pub fn new(
        file: impl Into<String>,
        line: u32,
        function: impl Into<String>,
        source_text: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            line,
            function: function.into(),
            source_text: source_text.into(),
        }
    }

    /// Build a frame from a raw `(file, line, function, code)` stack slice
    pub fn from_trace_slice<F, N, S>((file, line, function, code): (F, u32, N, S)) -> Self
    where
        F: Into<String>,
        N: Into<String>,
        S: Into<String>,
    {
        Self::new(file, line, function, code)
    }

    /// Capture the file and line of the caller.
    ///
    /// Rust has no runtime access to the enclosing function name or source
    /// text, so those are left empty.
    #[track_caller]
    pub fn caller() -> Self {
        let loc = std::panic::Location::caller();
        Self::new(loc.file(), loc.line(), "", "")
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)?;
        if !self.function.is_empty() {
            write!(f, " in {}", self.function)?;
        }
        Ok(())
    }
}

/// Ordered, append-only sequence of frames
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    frames: Vec<Frame>,
}

impl Location {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_frame(frame: Frame) -> Self {
        Self { frames: vec![frame] }
    }

    #[track_caller]
    pub fn here() -> Self {
        Self::from_frame(Frame::caller())
    }

    pub fn push_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Append every frame of `other`, preserving both orders
    pub fn extend(&mut self, other: &Location) {
        self.frames.extend(other.frames.iter().cloned());
    }

    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn first(&self) -> Option<&Frame> {
        self.frames.first()
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }
}

impl From<Frame> for Location {
    fn from(frame: Frame) -> Self {
        Self::from_frame(frame)
    }
}
