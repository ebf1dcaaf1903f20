// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Switch-to-motor passthrough.
//!
//! In local mode the puppet's own sensor switches drive the motors directly: every edge on a
//! sensor input copies its level to the matching actuator output. There is no debouncing.
//!
//! Edge handling is a single read and write and never touches the actuator state machines, so
//! it is safe to call from the edge interrupt.

use embedded_hal::digital::{InputPin, OutputPin, PinState};

use crate::error::{keep_first, Error, Result};
use crate::mechanism::{Mechanism, Mechanisms};

/// One sensor input paired with the output it mirrors onto.
pub struct Mirror<I, O> {
    input: I,
    output: Option<O>,
}

impl<I: InputPin, O: OutputPin> Mirror<I, O> {
    /// Create a detached mirror. It has no effect until [`attach`](Self::attach) is called.
    pub fn new(input: I) -> Self {
        Self {
            input,
            output: None,
        }
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.output.is_some()
    }

    /// Take ownership of `output` and bring it to the current input level.
    pub fn attach(&mut self, output: O) -> Result<()> {
        self.output = Some(output);
        self.sync()
    }

    /// Release the output line. Later edges are ignored.
    pub fn detach(&mut self) -> Option<O> {
        self.output.take()
    }

    /// Copy the input level to the output. No-op while detached.
    pub fn sync(&mut self) -> Result<()> {
        let Some(output) = self.output.as_mut() else {
            return Ok(());
        };
        let high = self.input.is_high().map_err(Error::gpio)?;
        output
            .set_state(PinState::from(high))
            .map_err(Error::gpio)
    }
}

/// The three mirrors, one per mechanism.
pub struct PassthroughBridge<I, O> {
    mirrors: Mechanisms<Mirror<I, O>>,
}

impl<I: InputPin, O: OutputPin> PassthroughBridge<I, O> {
    /// Create a bridge with every mirror detached.
    pub fn new(inputs: Mechanisms<I>) -> Self {
        Self {
            mirrors: inputs.map(|_, input| Mirror::new(input)),
        }
    }

    pub fn is_attached(&self, mechanism: Mechanism) -> bool {
        self.mirrors.get(mechanism).is_attached()
    }

    /// Attach `mechanism`'s output, syncing it to its input.
    pub fn attach(&mut self, mechanism: Mechanism, output: O) -> Result<()> {
        self.mirrors.get_mut(mechanism).attach(output)
    }

    /// Attach all three outputs, syncing each to its input.
    ///
    /// Every output is attached even if an earlier one fails; the first error is returned.
    pub fn attach_all(&mut self, outputs: Mechanisms<O>) -> Result<()> {
        let Mechanisms { head, tail, mouth } = outputs;
        let mut first = self.attach(Mechanism::Head, head);
        keep_first(&mut first, self.attach(Mechanism::Tail, tail));
        keep_first(&mut first, self.attach(Mechanism::Mouth, mouth));
        first
    }

    /// Detach all three outputs and hand them back.
    pub fn detach_all(&mut self) -> Mechanisms<Option<O>> {
        let mut released = Mechanisms::new(None, None, None);
        self.mirrors.for_each_mut(|mech, mirror| {
            *released.get_mut(mech) = mirror.detach();
        });
        released
    }

    /// Handle a level change on `mechanism`'s sensor input.
    #[inline]
    pub fn on_edge(&mut self, mechanism: Mechanism) -> Result<()> {
        self.mirrors.get_mut(mechanism).sync()
    }
}
