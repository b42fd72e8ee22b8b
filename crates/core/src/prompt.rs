use crate::models::ScoredChunk;

/// Instructional template sent to the generative model. The wording, the four
/// enumerated sections, and the `{entity}`/`{context}` placeholder names are
/// load-bearing for downstream consumers; do not edit them.
pub const ENTITY_SUMMARY_TEMPLATE: &str = "\
You are a service that allows users to query parliamentary meeting records by an entity that can be a name, topic or anything else the user types.

You will be given context which is from the parliamentary meeting records that are relevant to the entity, use this context to help you.

The user has entered the entity: '{entity}'
Below is the context that you can use to generate the answer: '{context}'

You have now been given all the context

1) A summary that will give insight into what the entity is and how it relates to the context that the user has entered.
2) List all key events within the context that are relevant to the entity that the user has entered.
3) List all contributions and names within the context that are relevant to the entity that the user has entered.
4) List all times and dates within the context that are relevant to the entity that the user has entered.

You response must follow this template:
 1) summary
 2) key events
 3) contributions/names
 4) times/dates
";

/// Interpolates the entity and the retrieved context into the fixed template.
/// Chunk texts are joined in ranked order, separated by a blank line. Pure
/// and deterministic: identical inputs always produce identical output.
pub fn compose_entity_prompt(entity: &str, context_chunks: &[ScoredChunk]) -> String {
    let context = context_chunks
        .iter()
        .map(|chunk| chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    ENTITY_SUMMARY_TEMPLATE
        .replace("{entity}", entity)
        .replace("{context}", &context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScoredChunk;

    fn scored(text: &str, score: f32) -> ScoredChunk {
        ScoredChunk {
            chunk_id: "id".to_string(),
            text: text.to_string(),
            start_index: 0,
            metadata: Default::default(),
            score,
        }
    }

    #[test]
    fn entity_and_context_are_interpolated() {
        let prompt = compose_entity_prompt(
            "budget committee",
            &[scored("first chunk", 0.9), scored("second chunk", 0.5)],
        );

        assert!(prompt.contains("The user has entered the entity: 'budget committee'"));
        assert!(prompt.contains("first chunk\n\nsecond chunk"));
        assert!(!prompt.contains("{entity}"));
        assert!(!prompt.contains("{context}"));
    }

    #[test]
    fn composition_is_deterministic() {
        let chunks = vec![scored("alpha", 0.8), scored("beta", 0.4)];
        let first = compose_entity_prompt("some entity", &chunks);
        let second = compose_entity_prompt("some entity", &chunks);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_retrieval_still_yields_a_complete_prompt() {
        let prompt = compose_entity_prompt("ghost entity", &[]);
        assert!(prompt.contains("The user has entered the entity: 'ghost entity'"));
        assert!(prompt.contains("generate the answer: ''"));
    }
}
