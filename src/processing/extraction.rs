//! Criterion extraction from raw product text via an LLM.
//!
//! Two modes: open extraction pulls every atomic measurable criterion a
//! text contains; targeted extraction only looks for criteria from a given
//! list. Prompts are fixed Russian text and the completion must be strict
//! JSON.

use serde::Deserialize;
use thiserror::Error;

use crate::clients::llm::{LlmError, StructuredCompletion};
use crate::domain::criterion::ExtractedCriterion;

const OPEN_SYSTEM_PROMPT: &str = r#"Вы - эксперт по анализу банковских продуктов. Ваша задача - извлечь из неструктурированного текста атомарные критерии для сравнения банковских продуктов. Критерии должны соответствовать следующим требованиям:

1. Конкретные и измеримые параметры
2. Представлены в формате "название критерия" и "значение"
3. На русском языке
4. Атомарные (один критерий = одно измерение)

Правила извлечения:
- Не объединяйте несколько параметров в один критерий
- Название критерия должно быть понятным без контекста
- Значение должно содержать только саму информацию без пояснений
- Игнорируйте общие фразы и маркетинговые формулировки
- Фокусируйтесь на конкретных цифрах, процентах, сроках, суммах
- Если параметр имеет диапазон, разделяйте на мин/макс критерии
- Игнорируйте информацию об условиях получения, требованиях к заемщику, документах - фокусируйтесь только на измеримых параметрах продукта

Примеры корректных критериев:
- "максимальная сумма кредита наличными": "7000000 рублей"
- "минимальная сумма кредита наличными": "50000 рублей"
- "срок кредита наличными": "до 7 лет"
- "минимальная процентная ставка со страхованием": "12.4%"
- "максимальная процентная ставка без страховки": "45.9%"

Примеры некорректных критериев:
- "условия кредита": "Сумма от 50000 до 7000000, срок до 7 лет"
- "ставка": "зависит от условий"
- "требования": "подтверждение дохода, возраст от 21 года"

ВАЖНО: Верните ТОЛЬКО валидный JSON в строго указанном формате без дополнительных комментариев или пояснений."#;

fn open_user_prompt(raw_text: &str, bank_name: &str, product_name: &str) -> String {
    format!(
        r#"БАНК: {bank_name}
ПРОДУКТ: {product_name}

СЫРЫЕ ДАННЫЕ ДЛЯ АНАЛИЗА:
{raw_text}

ЗАДАЧА: Извлеките ВСЕ возможные атомарные критерии из текста выше. Верните результат ТОЛЬКО в формате JSON:

{{
    "criteria": [
        {{
            "criterion": "название критерия",
            "value": "значение критерия"
        }},
        ...
    ]
}}

ТРЕБОВАНИЯ К ФОРМАТУ:
- Верните ТОЛЬКО валидный JSON без дополнительного текста
- Все критерии должны быть на русском языке
- Максимально детализируйте параметры (разделяйте диапазоны на отдельные критерии)
- Используйте точные формулировки из примеров корректных критериев
- Если в тексте нет измеримых параметров, верните пустой массив criteria"#
    )
}

fn targeted_system_prompt(wanted: &[String]) -> String {
    let list = wanted
        .iter()
        .map(|criterion| format!("- {criterion}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Вы - эксперт по анализу банковских продуктов. Ваша задача - извлечь ИЗ СПИСКА УКАЗАННЫХ КРИТЕРИЕВ те, которые присутствуют в тексте.

СПИСОК КРИТЕРИЕВ ДЛЯ ПОИСКА:
{list}

Правила:
- Извлекайте ТОЛЬКО критерии из указанного списка
- Если критерий из списка отсутствует в тексте - не включайте его в результат
- Значение должно быть точным и соответствовать тексту
- Все критерии должны быть на русском языке
- Верните ТОЛЬКО валидный JSON в формате {{"criteria": [{{"criterion": "название", "value": "значение"}}, ...]}}
- Если ни один критерий из списка не найден, верните пустой массив criteria"#
    )
}

fn targeted_user_prompt(raw_text: &str, bank_name: &str, product_name: &str) -> String {
    format!(
        r#"БАНК: {bank_name}
ПРОДУКТ: {product_name}

ТЕКСТ ДЛЯ АНАЛИЗА:
{raw_text}

ИЗВЛЕКАЙТЕ ТОЛЬКО КРИТЕРИИ ИЗ УКАЗАННОГО ВЫШЕ СПИСКА."#
    )
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("completion failed: {0}")]
    Completion(#[from] LlmError),
    #[error("malformed criteria payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
    #[error("criterion #{index} has an empty {field}")]
    EmptyField { index: usize, field: &'static str },
}

#[derive(Debug, Deserialize)]
struct CriteriaPayload {
    criteria: Vec<RawCriterion>,
}

#[derive(Debug, Deserialize)]
struct RawCriterion {
    criterion: String,
    value: String,
}

/// Extracts atomic comparison criteria from raw text through a
/// [`StructuredCompletion`] backend.
pub struct CriterionExtractor<C> {
    client: C,
}

impl<C: StructuredCompletion> CriterionExtractor<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Open mode: every atomic measurable criterion the text contains.
    pub async fn extract(
        &self,
        raw_text: &str,
        bank_name: &str,
        product_name: &str,
    ) -> Result<Vec<ExtractedCriterion>, ExtractionError> {
        let user = open_user_prompt(raw_text, bank_name, product_name);
        let completion = self.client.complete(OPEN_SYSTEM_PROMPT, &user).await?;
        parse_criteria(&completion)
    }

    /// Targeted mode: only criteria from `wanted`. An empty list falls back
    /// to open mode.
    pub async fn extract_targeted(
        &self,
        raw_text: &str,
        bank_name: &str,
        product_name: &str,
        wanted: &[String],
    ) -> Result<Vec<ExtractedCriterion>, ExtractionError> {
        if wanted.is_empty() {
            return self.extract(raw_text, bank_name, product_name).await;
        }

        let system = targeted_system_prompt(wanted);
        let user = targeted_user_prompt(raw_text, bank_name, product_name);
        let completion = self.client.complete(&system, &user).await?;
        parse_criteria(&completion)
    }
}

/// Drops a surrounding markdown code fence when the model added one.
pub(crate) fn strip_code_fence(completion: &str) -> &str {
    let trimmed = completion.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parses and validates a completion into criteria.
///
/// Any empty field after trimming invalidates the whole response; a bad
/// payload should fail loudly instead of half-importing.
pub(crate) fn parse_criteria(
    completion: &str,
) -> Result<Vec<ExtractedCriterion>, ExtractionError> {
    let payload: CriteriaPayload = serde_json::from_str(strip_code_fence(completion))?;

    let mut criteria = Vec::with_capacity(payload.criteria.len());
    for (index, raw) in payload.criteria.into_iter().enumerate() {
        let criterion = raw.criterion.trim();
        if criterion.is_empty() {
            return Err(ExtractionError::EmptyField {
                index,
                field: "criterion",
            });
        }

        let value = raw.value.trim();
        if value.is_empty() {
            return Err(ExtractionError::EmptyField {
                index,
                field: "value",
            });
        }

        criteria.push(ExtractedCriterion {
            criterion: criterion.to_string(),
            value: value.to_string(),
        });
    }

    Ok(criteria)
}
