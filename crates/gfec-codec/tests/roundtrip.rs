//! End-to-end encode, erase, decode across strategies and geometries.

use gfec_codec::{
    audit, audit_limited, cauchy_matrix, derive_decode, encode, expand, generator_matrix, Code, ErasureSet, ExpandedTables,
    Strategy,
};
use gfec_math::GfMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Sources followed by freshly encoded parities, one `Vec` per coded row.
fn encode_all(g: &GfMatrix, k: usize, sources: &[Vec<u8>]) -> Vec<Vec<u8>> {
    let len = sources[0].len();
    let parity_rows = g.sub_rows(k, g.rows()).unwrap();
    let tables = ExpandedTables::from_matrix(&parity_rows).unwrap();
    let mut parity = vec![vec![0u8; len]; g.rows() - k];
    tables.encode(len, sources, &mut parity).unwrap();
    sources.iter().cloned().chain(parity).collect()
}

/// Regenerate the erased rows of `coded` and compare them to the originals.
fn recover_and_check(g: &GfMatrix, coded: &[Vec<u8>], erasures: &ErasureSet) -> Result<(), String> {
    let len = coded[0].len();
    let plan = match derive_decode(g, erasures) {
        Ok(plan) => plan,
        Err(e) if e.is_singular() => return Err("singular".into()),
        Err(e) => panic!("unexpected error: {e}"),
    };
    let inputs: Vec<&[u8]> = plan.index().iter().map(|&r| coded[r].as_slice()).collect();
    let mut outputs = vec![vec![0u8; len]; plan.outputs()];
    plan.expand().unwrap().encode(len, &inputs, &mut outputs).unwrap();
    for (out, &row) in outputs.iter().zip(erasures.sparse()) {
        assert_eq!(out, &coded[row], "row {row} of erasures {:?}", erasures.sparse());
    }
    Ok(())
}

fn random_sources(rng: &mut StdRng, k: usize, len: usize) -> Vec<Vec<u8>> {
    (0..k).map(|_| (0..len).map(|_| rng.gen()).collect()).collect()
}

fn for_each_pattern(m: usize, r: usize, mut f: impl FnMut(&[usize])) {
    fn walk(start: usize, m: usize, r: usize, cur: &mut Vec<usize>, f: &mut dyn FnMut(&[usize])) {
        if cur.len() == r {
            f(cur);
            return;
        }
        for row in start..m {
            cur.push(row);
            walk(row + 1, m, r, cur, f);
            cur.pop();
        }
    }
    walk(0, m, r, &mut Vec::new(), &mut f);
}

#[test]
fn test_concrete_four_of_six() {
    let (k, m, len) = (4, 6, 16);
    let g = cauchy_matrix(k, m).unwrap();
    let sources: Vec<Vec<u8>> = (0..k).map(|b| (0..len).map(|i| (b * len + i) as u8).collect()).collect();
    let coded = encode_all(&g, k, &sources);
    assert_eq!(coded[1], (0x10u8..0x20).collect::<Vec<_>>());

    let erasures = ErasureSet::new(k, m, &[1, 4]).unwrap();
    let plan = derive_decode(&g, &erasures).unwrap();
    assert_eq!(plan.index(), &[0, 2, 3, 5]);

    let inputs: Vec<&[u8]> = plan.index().iter().map(|&r| coded[r].as_slice()).collect();
    let mut outputs = vec![vec![0u8; len]; 2];
    plan.expand().unwrap().encode(len, &inputs, &mut outputs).unwrap();
    assert_eq!(outputs[0], (0x10u8..0x20).collect::<Vec<_>>());
    assert_eq!(outputs[1], coded[4]);
}

#[test]
fn test_every_pattern_cauchy() {
    let mut rng = StdRng::seed_from_u64(0xCA0C);
    for (k, m) in [(1, 3), (2, 3), (3, 5), (4, 6), (5, 8), (6, 10), (10, 13)] {
        let g = cauchy_matrix(k, m).unwrap();
        let coded = encode_all(&g, k, &random_sources(&mut rng, k, 97));
        // Fewer erasures than the maximum must also work.
        for lost in 0..=m - k {
            for_each_pattern(m, lost, |erased| {
                let e = ErasureSet::new(k, m, erased).unwrap();
                recover_and_check(&g, &coded, &e).unwrap_or_else(|why| panic!("k={k} m={m} {erased:?}: {why}"));
            });
        }
    }
}

#[test]
fn test_every_pattern_vandermonde_where_invertible() {
    let mut rng = StdRng::seed_from_u64(0x7A4D);
    for (k, m) in [(2, 4), (3, 6), (5, 9), (8, 12)] {
        let g = generator_matrix(Strategy::Vandermonde, k, m).unwrap();
        let coded = encode_all(&g, k, &random_sources(&mut rng, k, 33));
        let report = audit(Strategy::Vandermonde, k, m).unwrap();
        let mut singular = Vec::new();
        for_each_pattern(m, m - k, |erased| {
            let e = ErasureSet::new(k, m, erased).unwrap();
            if recover_and_check(&g, &coded, &e).is_err() {
                singular.push(erased.to_vec());
            }
        });
        // The audit and the decoder agree on which patterns are lost.
        assert_eq!(singular, report.singular, "k={k} m={m}");
    }
}

#[test]
fn test_vandermonde_singular_pattern_reaches_caller_and_is_not_cached() {
    let (k, m, len) = (22, 26, 4);
    let erased = [0usize, 10, 21, 24];

    // Lexicographic walk reaches [0, 10, 21, 24] well inside 2000 patterns.
    let report = audit_limited(Strategy::Vandermonde, k, m, 2000).unwrap();
    assert!(!report.is_mds());
    assert!(report.singular.contains(&erased.to_vec()), "{:?}", report.singular);

    let g = generator_matrix(Strategy::Vandermonde, k, m).unwrap();
    let e = ErasureSet::new(k, m, &erased).unwrap();
    assert!(derive_decode(&g, &e).unwrap_err().is_singular());

    let code = Code::with_strategy(Strategy::Vandermonde, k, m, len).unwrap();
    let data: Vec<u8> = (0..k * len).map(|i| i as u8).collect();
    let mut shards = data.clone();
    shards.extend(code.encode(&data).unwrap());

    // Reported on every attempt, never remembered.
    for _ in 0..2 {
        assert!(code.decode(&shards, &erased).unwrap_err().is_singular());
        assert_eq!(code.cached_decoders(), 0);
    }
    assert!(code.reconstruct(&mut shards, &erased).unwrap_err().is_singular());
    assert_eq!(code.cached_decoders(), 0);

    // A recoverable pattern on the same code still works and is cached.
    assert_eq!(code.decode(&shards, &[0]).unwrap(), data);
    assert_eq!(code.cached_decoders(), 1);
}

#[test]
fn test_cauchy_survivor_selections_invertible() {
    for (k, m) in [(2, 6), (4, 9), (7, 10), (9, 12), (12, 15), (20, 22)] {
        let report = audit(Strategy::Cauchy, k, m).unwrap();
        assert!(report.is_mds(), "k={k} m={m}: {:?}", report.singular);
    }
}

#[test]
fn test_split_length_matches_whole() {
    let mut rng = StdRng::seed_from_u64(0x5917);
    let (k, m, len) = (6, 9, 10_000);
    let g = cauchy_matrix(k, m).unwrap();
    let tables = expand(k, m - k, g.sub_rows(k, m).unwrap().as_bytes()).unwrap();
    let sources = random_sources(&mut rng, k, len);

    let mut whole = vec![vec![0u8; len]; m - k];
    encode(len, k, m - k, &tables, &sources, &mut whole).unwrap();

    let cut = 4321;
    let mut halves = vec![vec![0u8; len]; m - k];
    let front: Vec<&[u8]> = sources.iter().map(|s| &s[..cut]).collect();
    let back: Vec<&[u8]> = sources.iter().map(|s| &s[cut..]).collect();
    {
        let mut dest: Vec<&mut [u8]> = halves.iter_mut().map(|d| &mut d[..cut]).collect();
        encode(cut, k, m - k, &tables, &front, &mut dest).unwrap();
    }
    {
        let mut dest: Vec<&mut [u8]> = halves.iter_mut().map(|d| &mut d[cut..]).collect();
        encode(len - cut, k, m - k, &tables, &back, &mut dest).unwrap();
    }
    assert_eq!(halves, whole);
}

#[test]
fn test_disjoint_ranges_on_threads() {
    let mut rng = StdRng::seed_from_u64(0x7487);
    let (k, m, len, workers) = (8, 12, 4 * 4096 + 100, 4);
    let g = cauchy_matrix(k, m).unwrap();
    let tables = ExpandedTables::from_matrix(&g.sub_rows(k, m).unwrap()).unwrap();
    let sources = random_sources(&mut rng, k, len);

    let mut expected = vec![vec![0u8; len]; m - k];
    tables.encode(len, &sources, &mut expected).unwrap();

    let chunk = len.div_ceil(workers);
    let mut parity = vec![vec![0u8; len]; m - k];
    // Hand each worker its own slice of every parity buffer.
    let mut per_worker: Vec<Vec<&mut [u8]>> = (0..workers).map(|_| Vec::new()).collect();
    for p in parity.iter_mut() {
        for (w, piece) in p.chunks_mut(chunk).enumerate() {
            per_worker[w].push(piece);
        }
    }
    std::thread::scope(|s| {
        for (w, mut dest) in per_worker.into_iter().enumerate() {
            let tables = &tables;
            let sources = &sources;
            s.spawn(move || {
                let start = w * chunk;
                let end = (start + chunk).min(len);
                let src: Vec<&[u8]> = sources.iter().map(|x| &x[start..end]).collect();
                tables.encode(end - start, &src, &mut dest).unwrap();
            });
        }
    });
    assert_eq!(parity, expected);
}

#[test]
fn test_code_reconstructs_mixed_loss() {
    let mut rng = StdRng::seed_from_u64(0xC0DE);
    let (k, m, len) = (5, 8, 200);
    for strategy in [Strategy::Cauchy, Strategy::Vandermonde] {
        let code = Code::with_strategy(strategy, k, m, len).unwrap();
        let data: Vec<u8> = (0..k * len).map(|_| rng.gen()).collect();
        let mut shards = data.clone();
        shards.extend(code.encode(&data).unwrap());
        let pristine = shards.clone();

        for erased in [vec![0usize, 6, 7], vec![1, 2, 3], vec![4], vec![5, 7]] {
            let mut damaged = pristine.clone();
            for &row in &erased {
                damaged[row * len..(row + 1) * len].fill(0);
            }
            assert_eq!(code.decode(&damaged, &erased).unwrap(), data, "{strategy} {erased:?}");
            code.reconstruct(&mut damaged, &erased).unwrap();
            assert_eq!(damaged, pristine, "{strategy} {erased:?}");
        }
    }
}

#[test]
fn test_code_shared_between_threads() {
    let (k, m, len) = (4, 7, 64);
    let code = Code::new(k, m, len).unwrap();
    let data: Vec<u8> = (0..k * len).map(|i| (i * 31) as u8).collect();
    let mut shards = data.clone();
    shards.extend(code.encode(&data).unwrap());

    let patterns = [vec![0usize, 1, 2], vec![3, 5], vec![0, 1, 2], vec![2, 6]];
    std::thread::scope(|s| {
        for erased in &patterns {
            let (code, shards, data) = (&code, &shards, &data);
            s.spawn(move || assert_eq!(&code.decode(shards, erased).unwrap(), data));
        }
    });
    assert_eq!(code.cached_decoders(), 3);
}
