use std::time::Duration;

use anyhow::Context as _;
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::domain::repository::CmsRepository;
use crate::domain::types::{
    CaseStudy, ExternalSource, NewCaseStudy, NewsPost, Organization, Page, Project, Report, Tag,
};
use crate::error::ContentServiceError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_API_VERSION: &str = "v2021-10-21";

// ── GROQ ─────────────────────────────────────────────────────────────────────

const SLUG_MATCH: &str = "$slug in [slug.en, slug.es, slug.fr, slug.pt]";

const TAG: &str = r#"_id, "slug": coalesce(slug.current, _id), label"#;

const ORGANIZATION: &str =
    r#"_id, "slug": coalesce(slug.current, _id), name, description, website, country"#;

fn tags() -> String {
    format!(r#""tags": coalesce(tags[]->{{{TAG}}}, [])"#)
}

fn news_fields(with_body: bool) -> String {
    format!(
        r#"_id, title, slug, excerpt, {body}publishedAt, "coverImageUrl": coverImage.asset->url, {tags}"#,
        body = if with_body { "body, " } else { "" },
        tags = tags(),
    )
}

fn case_study_fields(with_body: bool) -> String {
    format!(
        r#"_id, _createdAt, title, slug, summary, {body}status, country, "organization": organization->{{{ORGANIZATION}}}, organizationName, website, publishedAt, submittedBy, {tags}"#,
        body = if with_body { "body, " } else { "" },
        tags = tags(),
    )
}

const PUBLISHED_NEWS: &str =
    r#"_type == "newsPost" && defined(publishedAt) && publishedAt <= now()"#;
const PUBLISHED_CASE_STUDY: &str = r#"_type == "caseStudy" && status == "published""#;

#[derive(Deserialize)]
struct QueryResponse<T> {
    result: T,
}

/// Client of the headless CMS HTTP query and mutate API.
#[derive(Clone)]
pub struct HttpCmsClient {
    client: reqwest::Client,
    api_url: String,
    dataset: String,
    api_version: String,
    token: Option<String>,
}

impl HttpCmsClient {
    pub fn new(
        api_url: String,
        dataset: String,
        api_version: String,
        token: Option<String>,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("build CMS HTTP client")?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_owned(),
            dataset,
            api_version,
            token,
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/data/{action}/{}",
            self.api_url, self.api_version, self.dataset
        )
    }

    /// Run a GROQ query. Parameters are JSON-encoded as `$name`.
    async fn query<T: DeserializeOwned>(
        &self,
        groq: &str,
        params: &[(&str, Value)],
    ) -> Result<T, ContentServiceError> {
        let mut url = Url::parse(&self.endpoint("query")).context("CMS query URL")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", groq);
            for (name, value) in params {
                pairs.append_pair(&format!("${name}"), &value.to_string());
            }
        }

        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let resp = request.send().await.context("CMS query request failed")?;
        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("CMS query returned {status}").into());
        }
        let body: QueryResponse<T> = resp.json().await.context("decode CMS query result")?;
        Ok(body.result)
    }

    /// Smallest query the CMS will answer; used for readiness.
    pub async fn ping(&self) -> Result<(), ContentServiceError> {
        self.query::<Value>("1", &[]).await.map(|_| ())
    }

    async fn find_by_slug<T: DeserializeOwned>(
        &self,
        filter: &str,
        fields: &str,
        slug: &str,
    ) -> Result<Option<T>, ContentServiceError> {
        let groq = format!("*[{filter} && {SLUG_MATCH}][0]{{{fields}}}");
        self.query(&groq, &[("slug", json!(slug))]).await
    }

    async fn list<T: DeserializeOwned>(
        &self,
        filter: &str,
        fields: &str,
    ) -> Result<Vec<T>, ContentServiceError> {
        let groq = format!("*[{filter}]{{{fields}}}");
        self.query(&groq, &[]).await
    }
}

impl CmsRepository for HttpCmsClient {
    async fn find_page(&self, slug: &str) -> Result<Option<Page>, ContentServiceError> {
        self.find_by_slug(
            r#"_type == "page""#,
            r#"_id, title, slug, "blocks": coalesce(blocks, [])"#,
            slug,
        )
        .await
    }

    async fn list_news(&self) -> Result<Vec<NewsPost>, ContentServiceError> {
        self.list(PUBLISHED_NEWS, &news_fields(false)).await
    }

    async fn find_news_post(&self, slug: &str) -> Result<Option<NewsPost>, ContentServiceError> {
        self.find_by_slug(PUBLISHED_NEWS, &news_fields(true), slug)
            .await
    }

    async fn list_published_case_studies(&self) -> Result<Vec<CaseStudy>, ContentServiceError> {
        self.list(PUBLISHED_CASE_STUDY, &case_study_fields(false))
            .await
    }

    async fn find_published_case_study(
        &self,
        slug: &str,
    ) -> Result<Option<CaseStudy>, ContentServiceError> {
        self.find_by_slug(PUBLISHED_CASE_STUDY, &case_study_fields(true), slug)
            .await
    }

    async fn list_case_studies_by_submitter(
        &self,
        external_id: &str,
    ) -> Result<Vec<CaseStudy>, ContentServiceError> {
        let groq = format!(
            r#"*[_type == "caseStudy" && submittedBy == $submitter] | order(_createdAt desc){{{}}}"#,
            case_study_fields(false)
        );
        self.query(&groq, &[("submitter", json!(external_id))])
            .await
    }

    async fn create_case_study(&self, doc: &NewCaseStudy) -> Result<(), ContentServiceError> {
        let token = self.token.as_deref().ok_or_else(|| {
            ContentServiceError::Unavailable(anyhow::anyhow!("no CMS write token configured"))
        })?;
        let body = json!({ "mutations": [{ "create": doc }] });

        let resp = self
            .client
            .post(self.endpoint("mutate"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                ContentServiceError::Unavailable(
                    anyhow::Error::new(e).context("CMS mutate request failed"),
                )
            })?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            let detail = resp.text().await.unwrap_or_default();
            Err(ContentServiceError::Unavailable(anyhow::anyhow!(
                "CMS mutate returned {status}: {detail}"
            )))
        }
    }

    async fn list_external_sources(&self) -> Result<Vec<ExternalSource>, ContentServiceError> {
        let fields = format!("_id, title, summary, url, publisher, publishedAt, {}", tags());
        self.list(r#"_type == "externalSource" && defined(url)"#, &fields)
            .await
    }

    async fn list_reports(&self) -> Result<Vec<Report>, ContentServiceError> {
        let fields = format!(
            r#"_id, title, summary, "fileUrl": file.asset->url, publishedAt, {}"#,
            tags()
        );
        self.list(r#"_type == "report""#, &fields).await
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, ContentServiceError> {
        self.list(r#"_type == "tag""#, TAG).await
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, ContentServiceError> {
        self.list(r#"_type == "organization" && defined(name)"#, ORGANIZATION)
            .await
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ContentServiceError> {
        let fields = format!(
            r#"_id, "slug": coalesce(slug.current, _id), name, summary, "organization": organization->{{{ORGANIZATION}}}"#
        );
        self.list(r#"_type == "project""#, &fields).await
    }
}
