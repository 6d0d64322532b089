//! Structured parsing of free-text user questions.
//!
//! The conversational front door: an LLM turns a phrase like "сравни ставку
//! по вкладам в Сбербанке и Уралсибе" into lists of bank names, products and
//! criteria, which are then resolved against the reference tables.

use serde::{Deserialize, Serialize};

use crate::clients::llm::StructuredCompletion;
use crate::processing::extraction::strip_code_fence;
use crate::query::QueryError;
use crate::query::resolver::split_resolved;
use crate::repository::ReferenceReader;

const PARSE_SYSTEM_PROMPT: &str = r#"Вы - ассистент по банковским продуктам. Извлеките из фразы пользователя поля для поиска информации о банках.

Верните ТОЛЬКО валидный JSON в формате:
{
    "bank_names": ["список банков"],
    "products": ["услуги для сравнения"],
    "criteria": ["критерии сравнения услуг и банков"]
}

Правила:
- bank_names: названия банков, упомянутые пользователем
- products: банковские продукты или услуги для сравнения
- criteria: критерии сравнения услуг и банков
- Если поле не упомянуто, верните пустой массив
- Не добавляйте текст вне JSON"#;

/// Entity lists extracted from a user phrase.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRequest {
    pub bank_names: Vec<String>,
    pub products: Vec<String>,
    #[serde(default)]
    pub criteria: Vec<String>,
}

/// A [`UserRequest`] resolved against the reference tables.
///
/// Names that did not clear the threshold are reported in the unresolved
/// lists instead of being silently dropped or replaced by a sentinel id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRequest {
    pub bank_ids: Vec<i32>,
    pub product_ids: Vec<i32>,
    pub criteria: Vec<String>,
    pub unresolved_banks: Vec<String>,
    pub unresolved_products: Vec<String>,
}

impl ResolvedRequest {
    /// True when every mentioned bank and product resolved to an id.
    pub fn is_fully_resolved(&self) -> bool {
        self.unresolved_banks.is_empty() && self.unresolved_products.is_empty()
    }
}

/// Asks the LLM to split a user phrase into entity lists.
pub async fn parse_user_request<C: StructuredCompletion>(
    client: &C,
    user_text: &str,
) -> Result<UserRequest, QueryError> {
    let user = format!(
        "Извлеки из запроса пользователя: {user_text} нужные поля для поиска информации о банках"
    );
    let completion = client.complete(PARSE_SYSTEM_PROMPT, &user).await?;
    let request: UserRequest = serde_json::from_str(strip_code_fence(&completion))?;
    Ok(request)
}

/// Parses a user phrase and resolves its entities to reference ids.
pub async fn resolve_request<C, R>(
    client: &C,
    repo: &R,
    user_text: &str,
    threshold: f64,
) -> Result<ResolvedRequest, QueryError>
where
    C: StructuredCompletion,
    R: ReferenceReader,
{
    let request = parse_user_request(client, user_text).await?;

    let banks: Vec<(i32, String)> = repo
        .list_banks()?
        .into_iter()
        .map(|bank| (bank.id, bank.name))
        .collect();
    let products: Vec<(i32, String)> = repo
        .list_products()?
        .into_iter()
        .map(|product| (product.id, product.name))
        .collect();

    let (bank_ids, unresolved_banks) = split_resolved(&request.bank_names, &banks, threshold);
    let (product_ids, unresolved_products) =
        split_resolved(&request.products, &products, threshold);

    Ok(ResolvedRequest {
        bank_ids,
        product_ids,
        criteria: request.criteria,
        unresolved_banks,
        unresolved_products,
    })
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::{parse_user_request, resolve_request};
    use crate::MATCH_THRESHOLD;
    use crate::clients::llm::{LlmError, StructuredCompletion};
    use crate::domain::bank::Bank;
    use crate::domain::product::Product;
    use crate::query::QueryError;
    use crate::repository::ReferenceReader;
    use crate::repository::errors::RepositoryResult;

    struct CannedClient {
        payload: String,
    }

    #[async_trait]
    impl StructuredCompletion for CannedClient {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, LlmError> {
            Ok(self.payload.clone())
        }
    }

    struct FixedReference;

    impl ReferenceReader for FixedReference {
        fn list_banks(&self) -> RepositoryResult<Vec<Bank>> {
            Ok(vec![
                Bank {
                    id: 1,
                    name: "Сбербанк".to_string(),
                },
                Bank {
                    id: 2,
                    name: "Уралсиб".to_string(),
                },
            ])
        }

        fn list_products(&self) -> RepositoryResult<Vec<Product>> {
            Ok(vec![Product {
                id: 5,
                name: "вклад".to_string(),
            }])
        }
    }

    #[tokio::test]
    async fn parses_fenced_payload_without_criteria() {
        let client = CannedClient {
            payload: "```json\n{\"bank_names\": [\"Сбербанк\"], \"products\": [\"вклад\"]}\n```"
                .to_string(),
        };

        let request = parse_user_request(&client, "ставки по вкладам в Сбербанке")
            .await
            .expect("parse succeeds");

        assert_eq!(request.bank_names, vec!["Сбербанк".to_string()]);
        assert_eq!(request.products, vec!["вклад".to_string()]);
        assert!(request.criteria.is_empty());
    }

    #[tokio::test]
    async fn free_text_payload_is_rejected() {
        let client = CannedClient {
            payload: "Не понял запрос, уточните банк.".to_string(),
        };

        let result = parse_user_request(&client, "сравни банки").await;

        assert!(matches!(result, Err(QueryError::MalformedRequest(_))));
    }

    #[tokio::test]
    async fn resolves_entities_and_reports_the_rest() {
        let client = CannedClient {
            payload: r#"{"bank_names": ["Сбербанкк", "Тинькофф"], "products": ["вклады"], "criteria": ["процентная ставка"]}"#
                .to_string(),
        };

        let resolved = resolve_request(&client, &FixedReference, "сравни вклады", MATCH_THRESHOLD)
            .await
            .expect("resolution succeeds");

        assert_eq!(resolved.bank_ids, vec![1]);
        assert_eq!(resolved.product_ids, vec![5]);
        assert_eq!(resolved.criteria, vec!["процентная ставка".to_string()]);
        assert_eq!(resolved.unresolved_banks, vec!["Тинькофф".to_string()]);
        assert!(resolved.unresolved_products.is_empty());
        assert!(!resolved.is_fully_resolved());
    }
}
