// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! The three independently driven mechanisms of the puppet.

/// One of the puppet's motorized mechanisms.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mechanism {
    Head,
    Tail,
    Mouth,
}

impl Mechanism {
    /// All mechanisms, in poll order.
    pub const ALL: [Mechanism; 3] = [Mechanism::Head, Mechanism::Tail, Mechanism::Mouth];

    /// Lowercase name used on the diagnostic console.
    pub fn name(self) -> &'static str {
        match self {
            Mechanism::Head => "head",
            Mechanism::Tail => "tail",
            Mechanism::Mouth => "mouth",
        }
    }
}

/// One value per mechanism.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Mechanisms<T> {
    pub head: T,
    pub tail: T,
    pub mouth: T,
}

impl<T> Mechanisms<T> {
    pub const fn new(head: T, tail: T, mouth: T) -> Self {
        Self { head, tail, mouth }
    }

    #[inline]
    pub fn get(&self, mechanism: Mechanism) -> &T {
        match mechanism {
            Mechanism::Head => &self.head,
            Mechanism::Tail => &self.tail,
            Mechanism::Mouth => &self.mouth,
        }
    }

    #[inline]
    pub fn get_mut(&mut self, mechanism: Mechanism) -> &mut T {
        match mechanism {
            Mechanism::Head => &mut self.head,
            Mechanism::Tail => &mut self.tail,
            Mechanism::Mouth => &mut self.mouth,
        }
    }

    /// Build a new triple by applying `f` to each value.
    pub fn map<U>(self, mut f: impl FnMut(Mechanism, T) -> U) -> Mechanisms<U> {
        Mechanisms {
            head: f(Mechanism::Head, self.head),
            tail: f(Mechanism::Tail, self.tail),
            mouth: f(Mechanism::Mouth, self.mouth),
        }
    }

    /// Visit each value mutably, in [`Mechanism::ALL`] order.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(Mechanism, &mut T)) {
        f(Mechanism::Head, &mut self.head);
        f(Mechanism::Tail, &mut self.tail);
        f(Mechanism::Mouth, &mut self.mouth);
    }
}
