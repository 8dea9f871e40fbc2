//! A fixed `(k, m, shard_len)` erasure code with cached decode tables.

use std::collections::HashMap;
use std::sync::Arc;

use gfec_core::{EcResult, Precondition};
use gfec_math::GfMatrix;
use log::debug;
use spin::Mutex;

use crate::dataplane;
use crate::decode::{derive_decode, DecodePlan};
use crate::erasure::ErasureSet;
use crate::expand::ExpandedTables;
use crate::generator::{generator_matrix, validate_geometry, Strategy};

/// A decode plan with its tables expanded, ready for the data plane.
#[derive(Debug)]
pub struct PreparedDecode {
    erasures: ErasureSet,
    plan: DecodePlan,
    tables: ExpandedTables,
}

impl PreparedDecode {
    #[inline]
    pub fn erasures(&self) -> &ErasureSet {
        &self.erasures
    }

    #[inline]
    pub fn plan(&self) -> &DecodePlan {
        &self.plan
    }

    #[inline]
    pub fn tables(&self) -> &ExpandedTables {
        &self.tables
    }
}

/// Erasure code over shards of `shard_len` bytes.
///
/// Any `k` of the `m` shards recreate the data. The generator and its
/// encode tables are built once; decode tables are built on first use of
/// each erasure pattern and shared afterwards. All methods take `&self`, so
/// one `Code` can serve many threads.
pub struct Code {
    k: usize,
    m: usize,
    shard_len: usize,
    strategy: Strategy,
    encode_matrix: GfMatrix,
    encode_tables: ExpandedTables,
    decoders: Mutex<HashMap<Vec<usize>, Arc<PreparedDecode>>>,
}

impl core::fmt::Debug for Code {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Code")
            .field("k", &self.k)
            .field("m", &self.m)
            .field("shard_len", &self.shard_len)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

impl Code {
    /// Cauchy-coded `k`-of-`m` code over `shard_len`-byte shards.
    pub fn new(k: usize, m: usize, shard_len: usize) -> EcResult<Self> {
        Self::with_strategy(Strategy::Cauchy, k, m, shard_len)
    }

    pub fn with_strategy(strategy: Strategy, k: usize, m: usize, shard_len: usize) -> EcResult<Self> {
        validate_geometry(k, m)?;
        if shard_len == 0 {
            return Err(Precondition::EmptyBlock.into());
        }
        let encode_matrix = generator_matrix(strategy, k, m)?;
        // Sources pass through; only the parity rows need tables.
        let encode_tables = ExpandedTables::from_matrix(&encode_matrix.sub_rows(k, m)?)?;
        debug!("created {strategy} code k={k} m={m} shard_len={shard_len}");
        Ok(Self {
            k,
            m,
            shard_len,
            strategy,
            encode_matrix,
            encode_tables,
            decoders: Mutex::new(HashMap::new()),
        })
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    #[inline]
    pub fn m(&self) -> usize {
        self.m
    }

    #[inline]
    pub fn shard_len(&self) -> usize {
        self.shard_len
    }

    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Bytes of source data per encode call.
    #[inline]
    pub fn data_len(&self) -> usize {
        self.k * self.shard_len
    }

    /// Bytes of parity produced per encode call.
    #[inline]
    pub fn parity_len(&self) -> usize {
        (self.m - self.k) * self.shard_len
    }

    #[inline]
    pub fn encode_matrix(&self) -> &GfMatrix {
        &self.encode_matrix
    }

    #[inline]
    pub fn encode_tables(&self) -> &ExpandedTables {
        &self.encode_tables
    }

    /// Encode `k * shard_len` contiguous bytes, returning the
    /// `(m - k) * shard_len` parity bytes. The data itself is shards `0..k`.
    pub fn encode(&self, data: &[u8]) -> EcResult<Vec<u8>> {
        expect_len("data", self.data_len(), data.len())?;
        let sources: Vec<&[u8]> = data.chunks_exact(self.shard_len).collect();
        let mut parity = vec![0u8; self.parity_len()];
        let mut outputs: Vec<&mut [u8]> = parity.chunks_exact_mut(self.shard_len).collect();
        self.encode_tables.encode(self.shard_len, &sources, &mut outputs)?;
        Ok(parity)
    }

    /// Encode `k` source shards into `m - k` caller-provided parity shards.
    pub fn encode_shards<S, D>(&self, sources: &[S], parity: &mut [D]) -> EcResult<()>
    where
        S: AsRef<[u8]>,
        D: AsMut<[u8]>,
    {
        self.encode_tables.encode(self.shard_len, sources, parity)
    }

    /// Recover the original `k * shard_len` bytes.
    ///
    /// `shards` holds all `m` shards back to back (`m * shard_len` bytes);
    /// the contents of erased shards are ignored. `erased` lists at most
    /// `m - k` shard indices in any order.
    pub fn decode(&self, shards: &[u8], erased: &[usize]) -> EcResult<Vec<u8>> {
        expect_len("shards", self.m * self.shard_len, shards.len())?;
        let mut data = shards[..self.data_len()].to_vec();
        let erasures = ErasureSet::new(self.k, self.m, erased)?;
        if erasures.source_count() == 0 {
            return Ok(data);
        }

        let prepared = self.prepare(&erasures)?;
        let recovered = self.run(&prepared, shards)?;
        let len = self.shard_len;
        for (out, &row) in erasures.missing_sources().iter().enumerate() {
            data[row * len..(row + 1) * len].copy_from_slice(&recovered[out * len..(out + 1) * len]);
        }
        Ok(data)
    }

    /// Rebuild every erased shard in place, parity included.
    pub fn reconstruct(&self, shards: &mut [u8], erased: &[usize]) -> EcResult<()> {
        expect_len("shards", self.m * self.shard_len, shards.len())?;
        let erasures = ErasureSet::new(self.k, self.m, erased)?;
        if erasures.is_empty() {
            return Ok(());
        }

        let prepared = self.prepare(&erasures)?;
        let recovered = self.run(&prepared, shards)?;
        let len = self.shard_len;
        for (out, &row) in erasures.sparse().iter().enumerate() {
            shards[row * len..(row + 1) * len].copy_from_slice(&recovered[out * len..(out + 1) * len]);
        }
        Ok(())
    }

    /// Decode tables for `erasures`, built on first request and cached.
    ///
    /// Singular patterns are reported every time and never cached.
    pub fn prepare(&self, erasures: &ErasureSet) -> EcResult<Arc<PreparedDecode>> {
        if erasures.k() != self.k || erasures.m() != self.m {
            return Err(Precondition::InvalidGeometry {
                k: erasures.k(),
                m: erasures.m(),
            }
            .into());
        }
        if let Some(hit) = self.decoders.lock().get(erasures.sparse()) {
            return Ok(Arc::clone(hit));
        }

        // Derive outside the lock; a racing thread computes the same plan.
        let plan = derive_decode(&self.encode_matrix, erasures)?;
        let tables = plan.expand()?;
        let prepared = Arc::new(PreparedDecode {
            erasures: erasures.clone(),
            plan,
            tables,
        });

        let mut decoders = self.decoders.lock();
        let shared = Arc::clone(decoders.entry(erasures.sparse().to_vec()).or_insert(prepared));
        debug!("cached decoder for erased shards {:?} ({} cached)", erasures.sparse(), decoders.len());
        Ok(shared)
    }

    /// Number of erasure patterns with cached decode tables.
    pub fn cached_decoders(&self) -> usize {
        self.decoders.lock().len()
    }

    /// Apply a prepared plan to the surviving shards, returning one
    /// `shard_len` output per erased row.
    fn run(&self, prepared: &PreparedDecode, shards: &[u8]) -> EcResult<Vec<u8>> {
        let len = self.shard_len;
        let inputs: Vec<&[u8]> = prepared
            .plan
            .index()
            .iter()
            .map(|&r| &shards[r * len..(r + 1) * len])
            .collect();
        let mut recovered = vec![0u8; prepared.plan.outputs() * len];
        let mut outputs: Vec<&mut [u8]> = recovered.chunks_exact_mut(len).collect();
        dataplane::encode(
            len,
            self.k,
            prepared.plan.outputs(),
            prepared.tables.as_bytes(),
            &inputs,
            &mut outputs,
        )?;
        Ok(recovered)
    }
}

fn expect_len(what: &'static str, expected: usize, got: usize) -> EcResult<()> {
    if expected != got {
        return Err(Precondition::DimensionMismatch { what, expected, got }.into());
    }
    Ok(())
}
