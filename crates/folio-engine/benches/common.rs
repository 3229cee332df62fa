// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_manuscript(chapters: usize) -> String {
    let chapter = "## Kapitel\n\n\
        Der Morgen begann mit einem leisen Regen über den Dächern der Stadt. \
        Anna stand am Fenster und sah den Tropfen zu. Sie lachte. \
        In der Küche kochte das Wasser für den Tee, und irgendwo schlug eine Tür.\n\n\
        Der alte Mann sagte: „Nehmt von dem hier, der ist gut.\n\
        Den hat meine Frau gemacht, oben in den Bergen.“\n\n\
        Über allen Gipfeln\nIst Ruh,\nIn allen Wipfeln\nSpürest du\nKaum einen Hauch;\n\n\
        *Der Bruder trug den Korb. Er beschwerte sich nicht.* \
        Mehr dazu unter https://example.com/notizen und in [[Tagebuch]].\n\n\
        ```\nkapitel = 3\n```\n\n";
    chapter.repeat(chapters)
}
