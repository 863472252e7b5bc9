//! Full-text cache backend (tantivy)
//!
//! Entries are indexed documents: exact lookups use a term query on the
//! key field, `search` runs ranked BM25 retrieval over the value field.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tantivy::{
    collector::TopDocs,
    query::{QueryParser, TermQuery},
    schema::{Field, IndexRecordOption, OwnedValue, Schema, STORED, STRING, TEXT},
    Index, IndexReader, IndexWriter, TantivyDocument, Term,
};

use vox_core::{CacheEntry, CacheStats, CacheStore, Error, Result};

/// Tantivy-backed cache with ranked text search
pub struct FullTextCache {
    index: Index,
    reader: IndexReader,
    writer: Mutex<IndexWriter>,
    key_field: Field,
    value_field: Field,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl FullTextCache {
    /// Open an index in RAM (`path` = None) or on disk.
    pub fn new(path: Option<&str>) -> Result<Self> {
        let mut schema_builder = Schema::builder();
        let key_field = schema_builder.add_text_field("key", STRING | STORED);
        let value_field = schema_builder.add_text_field("value", TEXT | STORED);
        let schema = schema_builder.build();

        let index = match path {
            Some(dir) => {
                std::fs::create_dir_all(dir)
                    .map_err(|e| Error::Construction(e.to_string()))?;
                let mmap_dir = tantivy::directory::MmapDirectory::open(Path::new(dir))
                    .map_err(|e| Error::Construction(e.to_string()))?;
                Index::open_or_create(mmap_dir, schema)
                    .map_err(|e| Error::Construction(e.to_string()))?
            }
            None => Index::create_in_ram(schema),
        };

        let reader = index
            .reader()
            .map_err(|e| Error::Construction(e.to_string()))?;
        let writer = index
            .writer(50_000_000) // 50MB buffer
            .map_err(|e| Error::Construction(e.to_string()))?;

        Ok(Self {
            index,
            reader,
            writer: Mutex::new(writer),
            key_field,
            value_field,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    fn commit_and_reload(&self, writer: &mut IndexWriter) -> Result<()> {
        writer.commit().map_err(|e| Error::Cache(e.to_string()))?;
        self.reader
            .reload()
            .map_err(|e| Error::Cache(e.to_string()))?;
        Ok(())
    }

    fn lookup(&self, key: &str) -> Result<Option<String>> {
        let searcher = self.reader.searcher();
        let query = TermQuery::new(
            Term::from_field_text(self.key_field, key),
            IndexRecordOption::Basic,
        );
        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(1))
            .map_err(|e| Error::Cache(e.to_string()))?;

        let Some((_, address)) = top_docs.into_iter().next() else {
            return Ok(None);
        };
        let doc: TantivyDocument = searcher
            .doc(address)
            .map_err(|e| Error::Cache(e.to_string()))?;
        let value = doc.get_first(self.value_field).and_then(|v| match v {
            OwnedValue::Str(s) => Some(s.clone()),
            _ => None,
        });
        Ok(value)
    }
}

#[async_trait]
impl CacheStore for FullTextCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self.lookup(key)?;
        if value.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, _ttl: Option<Duration>) -> Result<()> {
        // TTL is not supported by the index backend; entries live until
        // deleted or cleared.
        let mut writer = self.writer.lock();
        writer.delete_term(Term::from_field_text(self.key_field, key));

        let mut doc = TantivyDocument::default();
        doc.add_text(self.key_field, key);
        doc.add_text(self.value_field, value);
        writer
            .add_document(doc)
            .map_err(|e| Error::Cache(e.to_string()))?;

        self.commit_and_reload(&mut writer)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut writer = self.writer.lock();
        writer.delete_term(Term::from_field_text(self.key_field, key));
        self.commit_and_reload(&mut writer)
    }

    async fn clear(&self) -> Result<()> {
        let mut writer = self.writer.lock();
        writer
            .delete_all_documents()
            .map_err(|e| Error::Cache(e.to_string()))?;
        self.commit_and_reload(&mut writer)
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<CacheEntry>> {
        let searcher = self.reader.searcher();
        let parser = QueryParser::for_index(&self.index, vec![self.value_field]);
        let parsed = parser
            .parse_query(query)
            .map_err(|e| Error::Validation(format!("bad query: {e}")))?;

        let top_docs = searcher
            .search(&parsed, &TopDocs::with_limit(limit.max(1)))
            .map_err(|e| Error::Cache(e.to_string()))?;

        let mut out = Vec::with_capacity(top_docs.len());
        for (_, address) in top_docs {
            let doc: TantivyDocument = searcher
                .doc(address)
                .map_err(|e| Error::Cache(e.to_string()))?;
            let key = doc.get_first(self.key_field).and_then(|v| match v {
                OwnedValue::Str(s) => Some(s.clone()),
                _ => None,
            });
            let value = doc.get_first(self.value_field).and_then(|v| match v {
                OwnedValue::Str(s) => Some(s.clone()),
                _ => None,
            });
            if let (Some(key), Some(value)) = (key, value) {
                out.push(CacheEntry { key, value });
            }
        }
        Ok(out)
    }

    async fn stats(&self) -> Result<CacheStats> {
        Ok(CacheStats {
            entries: self.reader.searcher().num_docs(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: 0,
        })
    }

    fn name(&self) -> &str {
        "whoosh"
    }
}
