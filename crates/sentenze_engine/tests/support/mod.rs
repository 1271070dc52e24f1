#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use sentenze_engine::{PipelineEvent, ProgressSink, Sleeper};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

/// Minimal PDF with one page per entry; `None` pages carry no text at all,
/// like an image-only scan.
pub fn pdf_with_pages(pages: &[Option<&str>]) -> Vec<u8> {
    let pages = pages
        .iter()
        .map(|page| match page {
            Some(text) => FixturePage::Text(text),
            None => FixturePage::Blank,
        })
        .collect::<Vec<_>>();
    pdf_from(&pages)
}

#[derive(Debug, Clone, Copy)]
pub enum FixturePage<'a> {
    Text(&'a str),
    /// Drawing operators only.
    Blank,
    /// `Contents` references an object that does not exist.
    DanglingContents,
    /// A FlateDecode stream whose bytes are not deflate data.
    CorruptStream,
}

pub fn pdf_from(pages: &[FixturePage<'_>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let content_id = match page {
            FixturePage::Text(text) => {
                let content = Content {
                    operations: vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 12.into()]),
                        Operation::new("Td", vec![72.into(), 720.into()]),
                        Operation::new("Tj", vec![Object::string_literal(*text)]),
                        Operation::new("ET", vec![]),
                    ],
                };
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()))
            }
            FixturePage::Blank => {
                let content = Content {
                    operations: vec![
                        Operation::new("re", vec![0.into(), 0.into(), 100.into(), 100.into()]),
                        Operation::new("f", vec![]),
                    ],
                };
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()))
            }
            FixturePage::DanglingContents => (9_999, 0),
            FixturePage::CorruptStream => doc.add_object(Stream::new(
                dictionary! { "Filter" => "FlateDecode" },
                b"definitely not deflate".to_vec(),
            )),
        };
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[derive(Default, Clone)]
pub struct TestSink {
    events: Arc<Mutex<Vec<PipelineEvent>>>,
}

impl TestSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<PipelineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: PipelineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Records requested delays instead of sleeping.
#[derive(Default, Clone)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

/// Real atomic writer that refuses to stage one named file.
pub struct FaultyStore {
    inner: sentenze_engine::AtomicFileWriter,
    fail_on: String,
}

impl FaultyStore {
    pub fn new(dir: &std::path::Path, fail_on: &str) -> Self {
        Self {
            inner: sentenze_engine::AtomicFileWriter::new(dir.to_path_buf()),
            fail_on: fail_on.to_string(),
        }
    }
}

impl sentenze_engine::ArtifactStore for FaultyStore {
    fn stage(
        &self,
        file_name: &str,
        content: &[u8],
    ) -> Result<sentenze_engine::StagedWrite, sentenze_engine::PersistError> {
        if file_name == self.fail_on {
            return Err(sentenze_engine::PersistError::Io(std::io::Error::other(
                "disk full",
            )));
        }
        self.inner.stage(file_name, content)
    }

    fn commit(
        &self,
        staged: sentenze_engine::StagedWrite,
    ) -> Result<sentenze_engine::WrittenArtifact, sentenze_engine::PersistError> {
        self.inner.commit(staged)
    }
}
