use bytes::BytesMut;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use emberkv::commands::{self, Command};
use emberkv::protocol;
use emberkv::storage::Db;

fn request(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

fn bench_framing(c: &mut Criterion) {
    c.bench_function("frame_extract_decode", |b| {
        b.iter(|| {
            let mut buf = BytesMut::from(&br#"["SET","bench:key","value"]"#[..]);
            let frame = protocol::extract(&mut buf).expect("complete frame");
            black_box(protocol::decode_request(&frame))
        })
    });
}

fn bench_classification(c: &mut Criterion) {
    let source = request(&["ZADD", "board", "1500", "player"]);
    c.bench_function("classify_request", |b| {
        b.iter(|| black_box(Command::from_request(&source)))
    });
}

fn bench_set_get(c: &mut Criterion) {
    let set = Command::from_request(&request(&["SET", "k", "value"])).expect("known verb");
    let get = Command::from_request(&request(&["GET", "k"])).expect("known verb");
    c.bench_function("str_set_get", |b| {
        let mut db = Db::new(0);
        b.iter(|| {
            commands::execute(&set, &mut db);
            black_box(commands::execute(&get, &mut db))
        })
    });
}

fn bench_zset_insert(c: &mut Criterion) {
    c.bench_function("zadd_1000_members", |b| {
        b.iter(|| {
            let mut db = Db::new(0);
            for i in 0..1000 {
                let source = vec![
                    "ZADD".to_string(),
                    "board".to_string(),
                    i.to_string(),
                    format!("member{i}"),
                ];
                let cmd = Command::from_request(&source).expect("known verb");
                commands::execute(&cmd, &mut db);
            }
            black_box(db.len())
        })
    });
}

criterion_group!(
    benches,
    bench_framing,
    bench_classification,
    bench_set_get,
    bench_zset_insert
);
criterion_main!(benches);
