//! Fixed-capacity token arena
//!
//! No dynamic allocation: `N` slots, each either free or owned. A handle is a
//! slot index plus the slot's generation at allocation time; releasing bumps
//! the generation, so a handle that outlived its token is detected instead of
//! silently reading whatever was allocated into the slot next.
//!
//! Owner tags are diagnostic metadata only (see [`TokenPool::report`]).

use core::fmt::{self, Write};

use super::Token;

/// Number of tokens that can be live at once.
pub const POOL_SIZE: usize = 20;

/// Value behind [`TokenHandle::EMPTY`].
static EMPTY_TOKEN: Token = Token::Empty;

/// Opaque reference to a pooled token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenHandle {
    index: u8,
    generation: u16,
}

impl TokenHandle {
    /// Shared empty sentinel.
    ///
    /// Always readable and duplicable, never owned: releasing it is a defect
    /// and is reported as [`PoolError::SentinelRelease`].
    pub const EMPTY: TokenHandle = TokenHandle {
        index: u8::MAX,
        generation: 0,
    };

    /// Whether this is the shared empty sentinel.
    pub fn is_sentinel(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Slot index, for diagnostics.
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

/// Pool failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// Every slot is owned.
    Exhausted,
    /// Handle's slot is already free.
    DoubleRelease { index: usize },
    /// Handle's slot was released and reallocated since.
    StaleHandle { index: usize },
    /// Attempt to release [`TokenHandle::EMPTY`].
    SentinelRelease,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted => f.write_str("token pool empty"),
            Self::DoubleRelease { index } => write!(f, "free token {} freed", index),
            Self::StaleHandle { index } => write!(f, "stale handle to token {}", index),
            Self::SentinelRelease => f.write_str("empty sentinel released"),
        }
    }
}

struct Slot {
    token: Token,
    live: bool,
    generation: u16,
    owner: &'static str,
}

impl Slot {
    const VACANT: Slot = Slot {
        token: Token::Empty,
        live: false,
        generation: 0,
        owner: "",
    };
}

/// Token arena of capacity `N` (at most 255).
pub struct TokenPool<const N: usize = POOL_SIZE> {
    slots: [Slot; N],
    live: usize,
    peak: usize,
}

impl<const N: usize> TokenPool<N> {
    /// Create an empty pool.
    pub const fn new() -> Self {
        assert!(N < u8::MAX as usize, "pool index must fit below the sentinel");

        Self {
            slots: [Slot::VACANT; N],
            live: 0,
            peak: 0,
        }
    }

    /// Take a free slot and store `token` in it.
    pub fn allocate(&mut self, owner: &'static str, token: Token) -> Result<TokenHandle, PoolError> {
        let index = self
            .slots
            .iter()
            .position(|s| !s.live)
            .ok_or(PoolError::Exhausted)?;

        let slot = &mut self.slots[index];
        slot.token = token;
        slot.live = true;
        slot.owner = owner;

        self.live += 1;
        self.peak = self.peak.max(self.live);

        Ok(TokenHandle {
            index: index as u8,
            generation: slot.generation,
        })
    }

    /// Allocate an independent copy of `handle`'s token.
    ///
    /// Duplicating [`TokenHandle::EMPTY`] yields an owned `Empty` token.
    pub fn duplicate(&mut self, handle: TokenHandle, owner: &'static str) -> Result<TokenHandle, PoolError> {
        let token = self.get(handle)?.clone();
        self.allocate(owner, token)
    }

    /// Return `handle`'s slot to the pool.
    ///
    /// Releasing twice, releasing a stale handle or releasing the sentinel
    /// is reported, and leaves the pool unchanged.
    pub fn release(&mut self, handle: TokenHandle) -> Result<(), PoolError> {
        if handle.is_sentinel() {
            return Err(PoolError::SentinelRelease);
        }

        let index = handle.index();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(PoolError::StaleHandle { index })?;

        if !slot.live {
            return Err(PoolError::DoubleRelease { index });
        }
        if slot.generation != handle.generation {
            return Err(PoolError::StaleHandle { index });
        }

        slot.live = false;
        slot.generation = slot.generation.wrapping_add(1);
        slot.token = Token::Empty;
        self.live -= 1;
        Ok(())
    }

    /// Read the token behind `handle`.
    pub fn get(&self, handle: TokenHandle) -> Result<&Token, PoolError> {
        if handle.is_sentinel() {
            return Ok(&EMPTY_TOKEN);
        }

        let index = handle.index();
        match self.slots.get(index) {
            Some(slot) if slot.live && slot.generation == handle.generation => Ok(&slot.token),
            _ => Err(PoolError::StaleHandle { index }),
        }
    }

    /// Owner tag recorded at allocation, if the handle is live.
    pub fn owner(&self, handle: TokenHandle) -> Option<&'static str> {
        let slot = self.slots.get(handle.index())?;
        (slot.live && slot.generation == handle.generation).then_some(slot.owner)
    }

    /// Number of owned tokens.
    pub fn live(&self) -> usize {
        self.live
    }

    /// Highest number of simultaneously owned tokens seen.
    pub fn peak(&self) -> usize {
        self.peak
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Owned slots as `(index, owner, token)`.
    pub fn live_tokens(&self) -> impl Iterator<Item = (usize, &'static str, &Token)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.live)
            .map(|(i, s)| (i, s.owner, &s.token))
    }

    /// Print one line per owned token, then a total.
    pub fn report(&self, out: &mut dyn Write, eol: &str) -> fmt::Result {
        for (index, owner, token) in self.live_tokens() {
            write!(out, "token {} in use by \"{}\"  {}{}", index, owner, token.describe(), eol)?;
        }
        write!(out, "{} tokens in use.{}", self.live, eol)
    }
}

impl<const N: usize> Default for TokenPool<N> {
    fn default() -> Self {
        Self::new()
    }
}
