//! Plain-text questionnaire document.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use formbot_core::{DialogueError, DocumentGenerator, Result, User};
use tracing::info;

const TITLE: &str = "ДОГОВОР КОНФИДЕНЦИАЛЬНОСТИ";
const CLAUSES: [&str; 4] = [
    "1. Конфиденциальная информация включает в себя все сведения, передаваемые сторонами.",
    "2. Стороны обязуются не разглашать полученные данные третьим лицам.",
    "3. Нарушение условий договора может повлечь за собой юридическую ответственность.",
    "4. Настоящий договор вступает в силу с момента подписания.",
];

/// Writes `<userId>-анкета.txt` under `output_dir`.
///
/// Expects answers `[full name, birth date, gender]`.
pub struct TextDocumentGenerator {
    output_dir: PathBuf,
}

impl TextDocumentGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_path(&self, user: &User) -> PathBuf {
        self.output_dir.join(format!("{}-анкета.txt", user.id))
    }
}

fn render(full_name: &str, birth_date: &str, gender: &str, attachment: &Path) -> String {
    let photo_line = if attachment.exists() {
        format!("Фото подписанта: {}", attachment.display())
    } else {
        "Фото: [Файл не найден]".to_string()
    };

    let mut lines = vec![
        TITLE.to_string(),
        String::new(),
        "Настоящий договор заключен между сторонами:".to_string(),
        format!("ФИО: {}", full_name),
        format!("Дата рождения: {}", birth_date),
        format!("Пол: {}", gender),
        String::new(),
        "СТОРОНЫ ДОГОВОРИЛИСЬ О СЛЕДУЮЩЕМ:".to_string(),
    ];
    lines.extend(CLAUSES.iter().map(|c| c.to_string()));
    lines.extend([
        String::new(),
        photo_line,
        String::new(),
        "__________________________".to_string(),
        format!("Подпись: {}", full_name),
        format!(
            "Дата подписания: {}",
            chrono::Local::now().format("%Y-%m-%d")
        ),
    ]);
    lines.join("\n") + "\n"
}

#[async_trait]
impl DocumentGenerator for TextDocumentGenerator {
    async fn generate(&self, user: &User, answers: &[String], attachment: &Path) -> Result<PathBuf> {
        let [full_name, birth_date, gender] = answers else {
            return Err(DialogueError::MissingAnswer(format!(
                "expected 3 answers, got {}",
                answers.len()
            ))
            .into());
        };

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_path(user);
        tokio::fs::write(&path, render(full_name, birth_date, gender, attachment)).await?;

        info!(user_id = user.id, path = %path.display(), "Document generated");
        Ok(path)
    }
}
