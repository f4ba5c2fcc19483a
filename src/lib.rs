pub mod core;
pub mod analysis;
pub mod schema;
pub mod query;
pub mod index;
pub mod search;
pub mod corpus;
pub mod server;

/*
┌──────────────────────────────────────────────────────────────────────────────┐
│                            FOLIO DATA FLOW                                   │
└──────────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────── OFFLINE ─────────────────────────────────────┐
│                                                                              │
│  <book>.json ────► CorpusPreparer ──► split_sentences ──► tokenize_sentence │
│                         │                                        │           │
│                         │                                  ngrams(1..=3)     │
│                         ▼                                        ▼           │
│                 MemoryIndex (paragraphs)            PhraseDictionary         │
│                 • text: literary analyzer                  │                 │
│                 • title/author: standard                   ▼                 │
│                                                  MemoryIndex (phrases)       │
└──────────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────── ONLINE ──────────────────────────────────────┐
│                                                                              │
│  GET /search/?q=     ──► QueryParser ──► QuerySpec ──► SearchIndex::search   │
│                           • 1 word: fuzzyPrefixTerm        │                 │
│                           • n words: phrasePrefix          ▼                 │
│                           • "quoted": term / phrase   DisplayRecord          │
│                                                       + highlight ranges     │
│                                                                              │
│  GET /typeahead/?q=  ──► Completer ──► search_terms(^last.*)                 │
│                           • verify against phrase index                      │
│                           • restore_case, rank_prefix_first                  │
│                           • CompletionCache (lru)                            │
└──────────────────────────────────────────────────────────────────────────────┘
*/
