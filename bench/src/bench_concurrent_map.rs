use dashmap::DashMap;
use rand::{distributions::Alphanumeric, Rng};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Instant;
use syncmap::{ConcurrentMap, Map};

const NUM_PAIRS: usize = 1_000_000;
const NUM_THREADS: usize = 8;
const READS_PER_WRITE: usize = 9;

macro_rules! bench {
    ($name: expr, $body: expr) => {
        let now = Instant::now();
        $body;
        println!("{} elapsed: {:.2?}", $name, now.elapsed());
    };
}

fn random_string() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(7)
        .map(char::from)
        .collect()
}

fn random_pairs(n: usize) -> Vec<(String, String)> {
    (0..n).map(|_| (random_string(), random_string())).collect()
}

fn split(pairs: &[(String, String)], parts: usize) -> Vec<Vec<(String, String)>> {
    let chunk = (pairs.len() + parts - 1) / parts;
    pairs.chunks(chunk.max(1)).map(<[_]>::to_vec).collect()
}

/// Runs `work` on one thread per slice of input, timing from the moment every
/// thread is ready until the last one finishes.
fn run_threads<M, F>(name: &str, map: Arc<M>, parts: Vec<Vec<(String, String)>>, work: F)
where
    M: Send + Sync + 'static,
    F: Fn(&M, Vec<(String, String)>) + Send + Sync + 'static,
{
    let work = Arc::new(work);
    let start = Arc::new(Barrier::new(parts.len() + 1));

    let handles: Vec<_> = parts
        .into_iter()
        .map(|part| {
            let map = map.clone();
            let work = work.clone();
            let start = start.clone();
            thread::spawn(move || {
                start.wait();
                work(&map, part);
            })
        })
        .collect();

    start.wait();
    let now = Instant::now();
    for h in handles {
        h.join().unwrap();
    }
    println!("{} elapsed: {:.2?}", name, now.elapsed());
}

fn bench_single_threaded(src: &[(String, String)]) {
    println!("bench single threaded set");

    let data = src.to_vec();
    bench!("ConcurrentMap", {
        let map = ConcurrentMap::new();
        for (key, val) in data {
            map.set(key, val);
        }
    });

    let data = src.to_vec();
    bench!("DashMap", {
        let map = DashMap::new();
        for (key, val) in data {
            map.insert(key, val);
        }
    });
}

fn bench_multi_threaded_set(src: &[(String, String)]) {
    println!("bench multi threaded set");

    run_threads(
        "ConcurrentMap",
        Arc::new(ConcurrentMap::new()),
        split(src, NUM_THREADS),
        |map: &ConcurrentMap<String, String>, part| {
            for (key, val) in part {
                map.set(key, val);
            }
        },
    );

    run_threads(
        "DashMap",
        Arc::new(DashMap::new()),
        split(src, NUM_THREADS),
        |map: &DashMap<String, String>, part| {
            for (key, val) in part {
                map.insert(key, val);
            }
        },
    );
}

fn bench_multi_threaded_mixed(src: &[(String, String)]) {
    println!("bench multi threaded mixed ({} reads per write)", READS_PER_WRITE);

    let map = ConcurrentMap::new();
    let dmap = DashMap::new();
    for (key, val) in src {
        map.set(key.clone(), val.clone());
        dmap.insert(key.clone(), val.clone());
    }

    run_threads(
        "ConcurrentMap",
        Arc::new(map),
        split(src, NUM_THREADS),
        |map: &ConcurrentMap<String, String>, part| {
            for (i, (key, val)) in part.into_iter().enumerate() {
                if i % (READS_PER_WRITE + 1) == 0 {
                    map.set(key, val);
                } else if map.contains_key(&key) {
                    let _ = map.get_ref(&key).map(|v| v.len());
                }
            }
        },
    );

    run_threads(
        "DashMap",
        Arc::new(dmap),
        split(src, NUM_THREADS),
        |map: &DashMap<String, String>, part| {
            for (i, (key, val)) in part.into_iter().enumerate() {
                if i % (READS_PER_WRITE + 1) == 0 {
                    map.insert(key, val);
                } else if map.contains_key(&key) {
                    let _ = map.get(&key).map(|v| v.len());
                }
            }
        },
    );
}

fn main() {
    let input = random_pairs(NUM_PAIRS);
    bench_single_threaded(&input);
    bench_multi_threaded_set(&input);
    bench_multi_threaded_mixed(&input);

    let map = ConcurrentMap::new();
    for (key, val) in input {
        map.set(key, val);
    }
    bench!("ConcurrentMap keys snapshot", {
        let keys = map.keys();
        println!("{} keys", keys.len());
    });
}
