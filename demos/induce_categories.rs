//! Induce word categories from a small inline corpus.
//!
//! ```text
//! RUST_LOG=syncat=debug cargo run --example induce_categories
//! ```

use syncat::{compare_clusterings, Corpus, Learner, LearnerConfig, NeighborMode, Result, Side};
use tracing_subscriber::EnvFilter;

const TEXT: &str = "
    the cat walked home. the dog walked home. a cat jumped. a dog jumped.
    he walked to the park. she walked to the park. he talked to a friend.
    she talked to a friend. they walk home. they talk a lot. they jump high.
    we are walking home. we are talking now. we are jumping high.
    the cat is jumping. the dog is walking. he jumped. she jumped.
";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let corpus = Corpus::parse(TEXT)?;
    let learner = Learner::train(&corpus, LearnerConfig::default())?;

    println!("Morphological buckets:");
    for label in learner.matrix().labels() {
        println!("  [{}] {}", label.label, label.stems.join(", "));
    }

    let induction = learner.search()?;
    if let Some(seed) = &induction.seed {
        println!("\nSeed (-{}): {}", seed.suffix, seed.words.join(", "));
    }

    println!("\nRight-word categories:");
    for cluster in induction.right.nontrivial() {
        println!("  {:?}", cluster);
    }
    println!("Left-word categories:");
    for cluster in induction.left.nontrivial() {
        println!("  {:?}", cluster);
    }
    println!(
        "Modularity: left {:.3}, right {:.3}",
        induction.left.dendrogram.modularity(),
        induction.right.dendrogram.modularity()
    );

    let right_words = induction.graph.words(Side::Right).to_vec();
    let bicliques = learner.bicliques(&right_words, Side::Right, NeighborMode::Union);
    if let Some(best) = bicliques.best() {
        println!(
            "\nBest biclique ({} found): {:?} x {:?}",
            bicliques.len(),
            best.left,
            best.right
        );
        let agreement = compare_clusterings(&induction.right.clusters, &[best.right.clone()]);
        println!(
            "Agreement with Louvain: nmi {:.3}, ari {:.3}, purity {:.3} over {} words",
            agreement.nmi, agreement.ari, agreement.purity, agreement.shared_words
        );
    }

    Ok(())
}
