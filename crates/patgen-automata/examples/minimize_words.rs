// Quick look: build a trie from the command-line words and print its minimized automaton
use patgen_automata::{DfaMinimizer, Trie};
use patgen_core::CancelFlag;

fn main() {
    let mut words: Vec<String> = std::env::args().skip(1).collect();
    if words.is_empty() {
        words = ["234", "2301", "501", "01"].map(String::from).to_vec();
    }

    let trie = Trie::from_strs(&words);
    println!(
        "Trie: {} states, {} transitions, {} words, alphabet {:?}",
        trie.state_count(),
        trie.transition_count(),
        trie.accepting_count(),
        trie.alphabet(),
    );
    println!("Longest shared prefix: {:?}", Trie::find_longest_common_prefix(&words));

    let minimizer =
        DfaMinimizer::minimize(&trie, &CancelFlag::new()).expect("Failed to minimize trie");
    let info = minimizer.automata_info().expect("Minimizer did not finish");
    println!(
        "Minimized: {} states, {} transitions, initial {}, {} accepting\n",
        info.state_count, info.transition_count, info.initial_state, info.accepting_count,
    );

    for (state, node) in trie.states().iter().enumerate() {
        let block = minimizer
            .block_of(state)
            .map_or_else(|| "-".to_string(), |b| b.to_string());
        let mark = if node.is_accepting() { "*" } else { " " };
        println!("  state {state:3}{mark} → block {block}");
    }

    print!("\n{}", minimizer.dump().expect("Minimizer did not finish"));
}
