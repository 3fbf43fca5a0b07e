//! Benchmarks for the C extractor

use codecatalog_c::{calls::call_sites, tokenize, CParser, EntityParser};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::path::Path;

fn generate_call_heavy_code(num_functions: usize) -> String {
    let mut code = String::from("#include <stdio.h>\n#include \"ccsp_base.h\"\n\n");

    for i in 0..num_functions {
        code.push_str(&format!(
            r#"
/* Handler {i} */
static int handler_{i}(struct ctx *c, int x)
{{
    int result = 0;

    if (c->check(x)) {{
        for (int j = 0; j < x; j++) {{
            result += step_{i}(j, helper(x, j));
        }}
    }} else {{
        CCSP_Report(c, "handler_{i}(failed)", x);
        c->ops->reset(c);
    }}

    return finish(result, {i});
}}
"#
        ));
    }

    code
}

fn generate_struct_heavy_code(num_structs: usize) -> String {
    let mut code = String::new();

    for i in 0..num_structs {
        code.push_str(&format!(
            r#"
/**
 * Record {i}
 */
typedef struct _Record_{i} {{
    uint32_t id;          /* identifier */
    char name[NAME_LEN];
    unsigned flags : 3;
    struct _Record_{i} *next;
    union {{
        int as_int;
        float as_float;
    }} value;
}} _struct_pack_ Record_{i}, *PRecord_{i};
"#
        ));
    }

    code
}

fn benchmark_tokenizer(c: &mut Criterion) {
    let source = generate_call_heavy_code(50);

    c.bench_function("tokenize_50_funcs", |b| {
        b.iter(|| tokenize(black_box(&source)).count())
    });
}

fn benchmark_call_sites(c: &mut Criterion) {
    let source = generate_call_heavy_code(50);

    c.bench_function("call_sites_50_funcs", |b| {
        b.iter(|| call_sites(black_box(&source)).len())
    });
}

fn benchmark_small_file(c: &mut Criterion) {
    let source = generate_call_heavy_code(10);
    let mut parser = CParser::new();

    c.bench_function("extract_small_file_10_funcs", |b| {
        b.iter(|| parser.parse_source(black_box(&source), Path::new("test.c"), "bench"))
    });
}

fn benchmark_large_file(c: &mut Criterion) {
    let source = generate_call_heavy_code(200);
    let mut parser = CParser::new();

    c.bench_function("extract_large_file_200_funcs", |b| {
        b.iter(|| parser.parse_source(black_box(&source), Path::new("test.c"), "bench"))
    });
}

fn benchmark_struct_heavy(c: &mut Criterion) {
    let source = generate_struct_heavy_code(50);
    let mut parser = CParser::new();

    c.bench_function("extract_struct_heavy_50_structs", |b| {
        b.iter(|| parser.parse_source(black_box(&source), Path::new("types.h"), "bench"))
    });
}

criterion_group!(
    benches,
    benchmark_tokenizer,
    benchmark_call_sites,
    benchmark_small_file,
    benchmark_large_file,
    benchmark_struct_heavy
);
criterion_main!(benches);
