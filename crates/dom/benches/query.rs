use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dom::Document;

fn build_page(rows: usize) -> Document {
    let mut html = String::from("<table id=\"grid\">");
    for i in 0..rows {
        html.push_str(&format!(
            "<tr class=\"row{}\"><td data-col=\"a\">{}</td><td data-col=\"b\">x</td></tr>",
            if i % 2 == 0 { " even" } else { "" },
            i
        ));
    }
    html.push_str("</table>");
    Document::parse_html(&html).expect("benchmark markup parses")
}

fn bench_queries(c: &mut Criterion) {
    let doc = build_page(500);
    let root = doc.root_id();

    c.bench_function("find_by_id", |b| b.iter(|| doc.find_by_id(black_box("grid"))));

    c.bench_function("query_selector_all class", |b| {
        b.iter(|| doc.query_selector_all(root, black_box("tr.even td[data-col=a]")))
    });

    c.bench_function("query_selector first match", |b| {
        b.iter(|| doc.query_selector(root, black_box("#grid td:last-child")))
    });
}

criterion_group!(benches, bench_queries);
criterion_main!(benches);
