use criterion::{black_box, criterion_group, criterion_main, Criterion};

use examsync_core::tokenizer::{
    extract_body_after_marker, extract_ordered_steps, split_instruction_from_notes,
    split_word_list_block, tokenize_blank_slots, tokenize_blanks,
};

fn bench_tokenizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenizer");

    let summary = r"Complete the notes below.\nWrite NO MORE THAN TWO WORDS for each answer on your answer sheet.\nNotes: the abbey was founded in ____ by ____; it moved to ____ after the ____.";

    let word_list = r"Complete the summary.\nFill in the blanks using the words below:\n\nBees visit ___[1] to gather ___[2], which they carry back to the ___[3].\n\n**Word List:**\nD. Honey\nB. Hives\nA. Flowers\nC. Pollen";

    let flow_chart = "Read the flow chart below: Harvest -> Sort -> Wash -> Dry -> Grind -> Pack.";

    let large_notes = {
        let mut s = String::from("Write your answers on your answer sheet.\\n");
        for i in 0..200 {
            s.push_str(&format!("Item {i}: ____ and ____\\n"));
        }
        s
    };

    group.bench_function("summary_notes", |b| {
        b.iter(|| {
            let sections = split_instruction_from_notes(black_box(summary)).into_inner();
            tokenize_blanks(&sections.notes)
        })
    });

    group.bench_function("word_list", |b| {
        b.iter(|| {
            let block = split_word_list_block(black_box(word_list)).into_inner();
            let body = extract_body_after_marker(&block.stem).into_inner();
            tokenize_blank_slots(&body)
        })
    });

    group.bench_function("flow_chart_steps", |b| {
        b.iter(|| extract_ordered_steps(black_box(flow_chart)))
    });

    group.bench_function("large_notes", |b| {
        b.iter(|| {
            let sections = split_instruction_from_notes(black_box(&large_notes)).into_inner();
            tokenize_blanks(&sections.notes)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_tokenizer);
criterion_main!(benches);
