// core/benches/parsing.rs
use c37118_core::ieee_c37_118::frame::{Frame, Message, Parser};
use c37118_core::ieee_c37_118::random::{random_config, random_frame};
use c37118_core::sample::samples_from_frame;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::fs;
use std::path::Path;

fn read_hex_file(file_name: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/test_data")
        .join(file_name);
    let content = fs::read_to_string(path)?;
    let hex_string: String = content.chars().filter(|c| !c.is_whitespace()).collect();

    Ok(hex::decode(hex_string)?)
}

fn benchmark_parse_data_frame(c: &mut Criterion) {
    let config_buffer = read_hex_file("config1_two_pmus.bin").unwrap();
    let data_buffer = read_hex_file("data_two_pmus.bin").unwrap();

    // Parse configuration once
    let mut parser = Parser::new();
    parser.deserialize(&config_buffer).unwrap();

    c.bench_function("parse_data_frame", |b| {
        b.iter(|| parser.deserialize(black_box(&data_buffer)).unwrap());
    });
}

fn benchmark_parse_multiple_frames(c: &mut Criterion) {
    let config_buffer = read_hex_file("config2_station1.bin").unwrap();
    let data_buffer = read_hex_file("data_station1.bin").unwrap();
    let mut parser = Parser::new();
    parser.deserialize(&config_buffer).unwrap();

    let mut multi_frame_buffer = Vec::new();
    for _ in 0..10000 {
        multi_frame_buffer.extend_from_slice(&data_buffer);
    }

    c.bench_function("parse_10000_frames", |b| {
        b.iter(|| {
            let mut offset = 0;
            while let Some(frame) = parser
                .deserialize(black_box(&multi_frame_buffer[offset..]))
                .unwrap()
            {
                offset += frame.framesize as usize;
            }
        });
    });
}

fn benchmark_parse_config_frame(c: &mut Criterion) {
    let parser = Parser::with_config(random_config(20));
    let config = parser.get_config().unwrap().clone();
    let buffer = parser
        .serialize(&Frame::new(1, Message::Config2(config.into())))
        .unwrap();

    c.bench_function("parse_config_frame_20_pmus", |b| {
        b.iter(|| {
            let mut parser = Parser::new();
            parser.deserialize(black_box(&buffer)).unwrap()
        });
    });
}

fn benchmark_serialize_data_frame(c: &mut Criterion) {
    let config = random_config(20);
    let parser = Parser::with_config(config.clone());
    let frame = random_frame(&config, 1);

    c.bench_function("serialize_data_frame_20_pmus", |b| {
        b.iter(|| parser.serialize(black_box(&frame)).unwrap());
    });
}

fn benchmark_samples_from_frame(c: &mut Criterion) {
    let config = random_config(20);
    let frame = random_frame(&config, 1);

    c.bench_function("samples_from_frame_20_pmus", |b| {
        b.iter(|| samples_from_frame(black_box(&frame), black_box(&config)));
    });
}

criterion_group!(
    benches,
    benchmark_parse_data_frame,
    benchmark_parse_multiple_frames,
    benchmark_parse_config_frame,
    benchmark_serialize_data_frame,
    benchmark_samples_from_frame
);
criterion_main!(benches);
