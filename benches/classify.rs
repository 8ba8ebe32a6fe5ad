use criterion::{black_box, criterion_group, criterion_main, Criterion};
use spellrite::checker::dictionary::Dictionary;
use spellrite::filter::MarkdownCodeFilter;
use spellrite::{DictionaryDetector, Options, SpellCore};
use std::sync::Arc;

const SAMPLE: &str = "This is a simple test of the colour checker. \
Some prose with a qwzzx or two, and `inline_code` that should be skipped.\n\
```\nfn main() { zzqwx(); }\n```\n";

fn bench_check(c: &mut Criterion) {
    let detector = Arc::new(DictionaryDetector::new(Dictionary::embedded().unwrap()));
    let options = Options::new(|_| Ok(()), |_| Ok(()))
        .filter(MarkdownCodeFilter)
        .warn_words(["colour"]);
    let mut core = SpellCore::new(options, detector).unwrap();
    let text = SAMPLE.repeat(50);

    c.bench_function("check markdown", |b| {
        b.iter(|| core.check(black_box(&text)).unwrap())
    });
}

criterion_group!(benches, bench_check);
criterion_main!(benches);
