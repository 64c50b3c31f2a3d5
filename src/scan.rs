//! Parallel building blocks shared by `Series` and the CSV reader.

use rayon::prelude::*;
use std::ops::Add;

/// Inputs shorter than this take the sequential path.
pub const LOWER_PAR_BOUND: usize = 8192;

/// Exclusive prefix sum. Returns the scanned values and the total.
///
/// Large inputs use the pairwise recursive scan: sum adjacent pairs, scan the
/// half-sized result, then expand it back out in parallel.
pub fn prefix_sum<T>(xs: &[T]) -> (Vec<T>, T)
where
    T: Copy + Default + Send + Sync + Add<Output = T>,
{
    if xs.len() < LOWER_PAR_BOUND {
        let mut acc = T::default();
        let mut pfs = Vec::with_capacity(xs.len());
        for &x in xs {
            pfs.push(acc);
            acc = acc + x;
        }
        return (pfs, acc);
    }

    let half = xs.len() / 2;
    let pairs: Vec<T> = (0..half)
        .into_par_iter()
        .map(|i| xs[2 * i] + xs[2 * i + 1])
        .collect();
    let (c_prefix, mut total) = prefix_sum(&pairs);

    let mut pfs: Vec<T> = (0..half)
        .into_par_iter()
        .flat_map_iter(|i| [c_prefix[i], c_prefix[i] + xs[2 * i]])
        .collect();

    if xs.len() % 2 == 1 {
        pfs.push(total);
        total = total + xs[xs.len() - 1];
    }

    (pfs, total)
}

/// Indices of the elements satisfying `pred`, in ascending order.
pub fn par_filter_indices<T, F>(xs: &[T], pred: F) -> Vec<usize>
where
    T: Sync,
    F: Fn(&T) -> bool + Send + Sync,
{
    if xs.len() < LOWER_PAR_BOUND {
        return xs
            .iter()
            .enumerate()
            .filter(|(_, x)| pred(x))
            .map(|(i, _)| i)
            .collect();
    }

    xs.par_iter()
        .enumerate()
        .filter(|(_, x)| pred(x))
        .map(|(i, _)| i)
        .collect()
}

/// Splits `st_buf` on `split_char`, yielding the same pieces as `str::split`.
pub fn par_split(st_buf: &str, split_char: char) -> Vec<&str> {
    let enumed: Vec<(usize, char)> = st_buf.char_indices().collect();
    let hits = par_filter_indices(&enumed, |&(_, c)| c == split_char);

    let width = split_char.len_utf8();
    let mut starts = Vec::with_capacity(hits.len() + 1);
    let mut ends = Vec::with_capacity(hits.len() + 1);
    starts.push(0);
    for &h in &hits {
        let offset = enumed[h].0;
        ends.push(offset);
        starts.push(offset + width);
    }
    ends.push(st_buf.len());

    starts
        .par_iter()
        .zip(ends.par_iter())
        .map(|(&a, &b)| &st_buf[a..b])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_sum_small() {
        let (pfs, total) = prefix_sum(&[1, 2, 3, 4]);
        assert_eq!(pfs, vec![0, 1, 3, 6]);
        assert_eq!(total, 10);
    }

    #[test]
    fn test_prefix_sum_empty() {
        let (pfs, total) = prefix_sum::<i64>(&[]);
        assert!(pfs.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn test_prefix_sum_parallel_matches_sequential() {
        // Odd length exercises the trailing element of the pairwise scan.
        let xs: Vec<u64> = (0..(LOWER_PAR_BOUND as u64 * 3 + 7)).collect();
        let (pfs, total) = prefix_sum(&xs);

        let mut acc = 0u64;
        for (i, &x) in xs.iter().enumerate() {
            assert_eq!(pfs[i], acc, "mismatch at {}", i);
            acc += x;
        }
        assert_eq!(total, acc);
    }

    #[test]
    fn test_par_filter_indices() {
        let xs: Vec<u32> = (0..20_000).collect();
        let evens = par_filter_indices(&xs, |x| x % 1000 == 0);
        assert_eq!(evens.len(), 20);
        assert_eq!(evens[0], 0);
        assert_eq!(evens[19], 19_000);
    }

    #[test]
    fn test_par_split_matches_str_split() {
        for s in ["a,b,c", ",lead", "trail,", "", "no-delim", ",,", "1.5,,NaN,é,x"] {
            let expected: Vec<&str> = s.split(',').collect();
            assert_eq!(par_split(s, ','), expected, "input {:?}", s);
        }
    }

    #[test]
    fn test_par_split_long_line() {
        let cells: Vec<String> = (0..5000).map(|i| i.to_string()).collect();
        let line = cells.join(",");
        let parts = par_split(&line, ',');
        assert_eq!(parts.len(), 5000);
        assert_eq!(parts[4999], "4999");
    }

    #[test]
    fn test_par_split_multibyte_delimiter() {
        assert_eq!(par_split("a→b→c", '→'), vec!["a", "b", "c"]);
    }
}
