//! In-process mock services backing the SDK integration suites.
#![allow(dead_code)]

use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_core::Stream;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tonic::{Request, Response, Status};

use confect_schema_grpc::catalog::v1::catalog_v1_server::{CatalogV1, CatalogV1Server};
use confect_schema_grpc::catalog::v1::{
    Brand, BrandsRequest, BrandsResponse, CatalogProduct, FinalProduct, MultiProductRequest,
    MultiProductResponse, ProductLine, ProductRequest, ProductResponse, Strain, StrainsRequest,
    StrainsResponse,
};
use confect_schema_grpc::store::v1::menu_v1_server::{MenuV1, MenuV1Server};
use confect_schema_grpc::store::v1::profile_v1_server::{ProfileV1, ProfileV1Server};
use confect_schema_grpc::store::v1::{
    MenuProduct, MenuRequest, MenuResponse, MenuSearchRequest, MenuSearchResponse,
    MenuSearchResultset, ProductGroupRequest, ProductGroupResponse, ProfileRequest,
    ProfileResponse, ProfileUpdateRequest, ProfileUpdateResponse, StoreUser,
    UsernameCheckRequest, UsernameCheckResponse, profile_request,
};

/// Records metadata the SDK attached to the most recent call.
#[derive(Clone, Default)]
pub struct SeenMetadata {
    api_key: Arc<Mutex<Option<String>>>,
}

impl SeenMetadata {
    pub fn record(&self, request: &Request<impl Sized>) {
        let api_key = confect_transport_grpc::extract_api_key(request.metadata());
        *self.api_key.lock().unwrap() = api_key.map(str::to_owned);
    }

    pub fn api_key(&self) -> Option<String> {
        self.api_key.lock().unwrap().clone()
    }
}

pub fn brand(id: &str, name: &str) -> Brand {
    Brand {
        id: id.to_owned(),
        name: name.to_owned(),
        slug: name.to_lowercase().replace(' ', "-"),
    }
}

/// Mock Catalog service with fixed inventory, an optional artificial delay
/// for timeout tests, and an optional injected mid-stream failure.
#[derive(Clone, Default)]
pub struct MockCatalogService {
    pub seen: SeenMetadata,
    pub delay: Option<Duration>,
    pub sync_fault: Option<tonic::Code>,
}

impl MockCatalogService {
    pub fn delayed(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Sync streams fail with `code` after the first batch is delivered.
    pub fn with_sync_fault(code: tonic::Code) -> Self {
        Self {
            sync_fault: Some(code),
            ..Self::default()
        }
    }

    async fn maybe_delay(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[tonic::async_trait]
impl CatalogV1 for MockCatalogService {
    async fn brands(
        &self,
        request: Request<BrandsRequest>,
    ) -> Result<Response<BrandsResponse>, Status> {
        self.seen.record(&request);
        self.maybe_delay().await;
        Ok(Response::new(BrandsResponse {
            brand: vec![brand("b-1", "Gold Leaf"), brand("b-2", "Night Garden")],
        }))
    }

    async fn strains(
        &self,
        request: Request<StrainsRequest>,
    ) -> Result<Response<StrainsResponse>, Status> {
        self.seen.record(&request);
        self.maybe_delay().await;
        let line = request.into_inner().line;
        let all = vec![
            Strain {
                id: "s-1".to_owned(),
                name: "Morning Frost".to_owned(),
                line: ProductLine::Thc as i32,
            },
            Strain {
                id: "s-2".to_owned(),
                name: "Quiet Hour".to_owned(),
                line: ProductLine::Cbd as i32,
            },
        ];
        let strain = if line == ProductLine::Unspecified as i32 {
            all
        } else {
            all.into_iter().filter(|s| s.line == line).collect()
        };
        Ok(Response::new(StrainsResponse { strain }))
    }

    async fn product(
        &self,
        request: Request<ProductRequest>,
    ) -> Result<Response<ProductResponse>, Status> {
        self.seen.record(&request);
        self.maybe_delay().await;
        let id = request.into_inner().id;
        let product = (id == "p-1").then(|| FinalProduct {
            id: "p-1".to_owned(),
            name: "Gold Leaf Gummies".to_owned(),
            brand: Some(brand("b-1", "Gold Leaf")),
            line: ProductLine::Thc as i32,
        });
        Ok(Response::new(ProductResponse { product }))
    }

    type SyncStream =
        Pin<Box<dyn Stream<Item = Result<MultiProductResponse, Status>> + Send + 'static>>;

    async fn sync(
        &self,
        request: Request<MultiProductRequest>,
    ) -> Result<Response<Self::SyncStream>, Status> {
        self.seen.record(&request);
        self.maybe_delay().await;
        let catalog_product = |id: &str, version: u64| CatalogProduct {
            id: id.to_owned(),
            name: format!("product {id}"),
            line: ProductLine::Thc as i32,
            version,
        };
        let mut batches = vec![Ok(MultiProductResponse {
            product: vec![catalog_product("p-1", 1), catalog_product("p-2", 2)],
        })];
        match self.sync_fault {
            Some(code) => batches.push(Err(Status::new(code, "stream interrupted"))),
            None => batches.push(Ok(MultiProductResponse {
                product: vec![catalog_product("p-3", 3)],
            })),
        }
        Ok(Response::new(Box::pin(futures::stream::iter(batches))))
    }
}

/// Mock Menu service echoing request details back into the response.
#[derive(Clone, Default)]
pub struct MockMenuService {
    pub seen: SeenMetadata,
}

fn menu_product(key: &str) -> MenuProduct {
    MenuProduct {
        key: key.to_owned(),
        product: Some(FinalProduct {
            id: key.to_owned(),
            name: format!("menu item {key}"),
            brand: Some(brand("b-1", "Gold Leaf")),
            line: ProductLine::Thc as i32,
        }),
    }
}

#[tonic::async_trait]
impl MenuV1 for MockMenuService {
    async fn menu(&self, request: Request<MenuRequest>) -> Result<Response<MenuResponse>, Status> {
        self.seen.record(&request);
        let req = request.into_inner();
        // One synthetic entry per requested product line so callers can
        // assert their filters arrived.
        let product = req
            .line
            .iter()
            .enumerate()
            .map(|(idx, line)| menu_product(&format!("line-{line}-{idx}")))
            .collect();
        Ok(Response::new(MenuResponse {
            product,
            generated: 1_700_000_000,
        }))
    }

    async fn menu_search(
        &self,
        request: Request<MenuSearchRequest>,
    ) -> Result<Response<MenuSearchResponse>, Status> {
        self.seen.record(&request);
        let query = request.into_inner().query;
        let result = if query == "gummies" {
            vec![menu_product("p-1")]
        } else {
            Vec::new()
        };
        let total = u32::try_from(result.len()).unwrap_or(u32::MAX);
        Ok(Response::new(MenuSearchResponse {
            resultset: Some(MenuSearchResultset { result, total }),
        }))
    }

    async fn product_fetch(
        &self,
        request: Request<ProductGroupRequest>,
    ) -> Result<Response<ProductGroupResponse>, Status> {
        self.seen.record(&request);
        let group_id = request.into_inner().group_id;
        if group_id.is_empty() {
            return Err(Status::invalid_argument("group_id is required"));
        }
        Ok(Response::new(ProductGroupResponse {
            product: vec![menu_product(&group_id)],
        }))
    }
}

/// Mock Profile service with per-username behavior, mirroring the server
/// contract the username check maps onto.
#[derive(Clone, Default)]
pub struct MockProfileService {
    pub seen: SeenMetadata,
}

#[tonic::async_trait]
impl ProfileV1 for MockProfileService {
    async fn profile_username_check(
        &self,
        request: Request<UsernameCheckRequest>,
    ) -> Result<Response<UsernameCheckResponse>, Status> {
        self.seen.record(&request);
        match request.into_inner().username.as_str() {
            "taken" => Err(Status::already_exists("username is taken")),
            "inactive" => Err(Status::failed_precondition("account not activated")),
            "$$$" => Err(Status::invalid_argument("username violates policy")),
            "boom" => Err(Status::internal("server fell over")),
            _ => Ok(Response::new(UsernameCheckResponse { available: true })),
        }
    }

    async fn profile(
        &self,
        request: Request<ProfileRequest>,
    ) -> Result<Response<ProfileResponse>, Status> {
        self.seen.record(&request);
        let subject = request.into_inner().subject;
        match subject {
            Some(profile_request::Subject::Username(name)) if name == "dough" => {
                Ok(Response::new(ProfileResponse {
                    user: Some(StoreUser {
                        user_id: "u-1".to_owned(),
                        username: "dough".to_owned(),
                        email: "dough@example.com".to_owned(),
                    }),
                    private: false,
                }))
            }
            _ => Err(Status::not_found("no such profile")),
        }
    }

    async fn profile_update(
        &self,
        request: Request<ProfileUpdateRequest>,
    ) -> Result<Response<ProfileUpdateResponse>, Status> {
        self.seen.record(&request);
        let user = request.into_inner().user;
        Ok(Response::new(ProfileUpdateResponse { user }))
    }
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

async fn serve(router: tonic::transport::server::Router) -> String {
    init_tracing();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback listener");
    let addr = listener.local_addr().expect("listener address");
    let incoming = TcpListenerStream::new(listener);
    tokio::spawn(async move {
        router
            .serve_with_incoming(incoming)
            .await
            .expect("mock server");
    });
    format!("http://{addr}")
}

/// Start a Catalog mock on an ephemeral loopback port; returns its URI.
pub async fn spawn_catalog(svc: MockCatalogService) -> String {
    serve(Server::builder().add_service(CatalogV1Server::new(svc))).await
}

/// Start Menu + Profile mocks on a single ephemeral loopback port.
pub async fn spawn_storefront(menu: MockMenuService, profile: MockProfileService) -> String {
    serve(
        Server::builder()
            .add_service(MenuV1Server::new(menu))
            .add_service(ProfileV1Server::new(profile)),
    )
    .await
}
