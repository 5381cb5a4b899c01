//! Sequence Predictor: an online stream of SDRs turned into learned
//! transitions, built from two triadic memories and a random-key context
//! trick.
//!
//! `M_keys` deduplicates high-order contexts: two distinct histories that
//! happen to share a recent bigram are disambiguated by a carried random
//! key `r`. The union `u = y_prev | r` is a variable-order fingerprint of
//! "how we got here"; `M_pred` maps that fingerprint plus the latest input
//! to the next input.
//!
//! Known imperfection (not a bug): storing `(u, y_prev) -> y` with no
//! terminator means that after the last element of a learned sequence the
//! predictor tends to recall the first element again. The reference
//! implementation this crate is built from reports the same behavior.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::MemoryError;
use crate::sdr::{self, random_sdr};
use crate::triadic::TriadicMemory;
use crate::Sdr;

/// Rolling context carried between [`SequencePredictor::predict`] calls:
/// the random context key, the union key it was derived from, and the
/// previous input.
#[derive(Debug, Clone)]
struct Context {
    r: Sdr,
    u: Sdr,
    y_prev: Sdr,
}

/// Two triadic memories plus a rolling 3-SDR context, turning a stream of
/// inputs into learned `(context, input) -> next input` transitions.
pub struct SequencePredictor<T: TriadicMemory> {
    m_keys: T,
    m_pred: T,
    context: Context,
    n: u32,
    p: u32,
    min_distance: f64,
    rng: ChaCha8Rng,
}

impl<T: TriadicMemory> SequencePredictor<T> {
    /// Builds a predictor from two freshly constructed triadic memories.
    /// `min_distance` (default `0.0` per the reference) gates whether an
    /// observed input is considered "already predicted" closely enough to
    /// skip teaching `M_pred`. `seed` makes the initial context and all
    /// future fresh-key draws reproducible.
    pub fn new(
        mut make_memory: impl FnMut() -> Result<T, MemoryError>,
        n: u32,
        p: u32,
        min_distance: f64,
        seed: u64,
    ) -> Result<Self, MemoryError> {
        let m_keys = make_memory()?;
        let m_pred = make_memory()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let context = Self::fresh_context(&mut rng, n, p);
        Ok(Self {
            m_keys,
            m_pred,
            context,
            n,
            p,
            min_distance,
            rng,
        })
    }

    fn fresh_context(rng: &mut ChaCha8Rng, n: u32, p: u32) -> Context {
        Context {
            r: random_sdr(rng, n, p),
            u: random_sdr(rng, n, p),
            y_prev: random_sdr(rng, n, p),
        }
    }

    /// Regenerates the rolling context with three fresh random SDRs,
    /// without touching either triadic memory's learned state.
    pub fn reset_context(&mut self) {
        self.context = Self::fresh_context(&mut self.rng, self.n, self.p);
    }

    /// Advances the predictor by one input, teaching it the transition it
    /// didn't already predict, and returns the prediction for the step
    /// after this one.
    ///
    /// Steps (verbatim from the reference design):
    /// 1. `pred := M_pred.query(u, y_prev, None)`.
    /// 2. If `distance(input, pred) > min_distance`, teach
    ///    `M_pred.store(u, y_prev, input)`.
    /// 3. `u_new := union(y_prev, r)`.
    /// 4. `r_new := M_keys.query(u_new, input, None)`,
    ///    `u_check := M_keys.query(None, input, r_new)`.
    /// 5. If `overlap(u_new, u_check) < P`, draw a fresh `r_new` and
    ///    `M_keys.store(u_new, input, r_new)`.
    /// 6. Update context to `(r_new, u_new, input)`.
    /// 7. Return `M_pred.query(u_new, input, None)`.
    pub fn predict(&mut self, input: &[u32]) -> Result<Sdr, MemoryError> {
        let Context { r, u, y_prev } = self.context.clone();

        let pred_inp = self.m_pred.query_z(&u, &y_prev)?;
        if sdr::distance(input, &pred_inp) > self.min_distance {
            self.m_pred.store(&u, &y_prev, input)?;
        }

        let u_new = sdr::union(&y_prev, &r);

        let mut r_new = self.m_keys.query_z(&u_new, input)?;
        let u_check = self.m_keys.query_x(input, &r_new)?;
        if sdr::overlap(&u_new, &u_check) < self.p as usize {
            r_new = random_sdr(&mut self.rng, self.n, self.p);
            self.m_keys.store(&u_new, input, &r_new)?;
        }

        self.context = Context {
            r: r_new,
            u: u_new.clone(),
            y_prev: input.to_vec(),
        };

        self.m_pred.query_z(&u_new, input)
    }
}
