use crate::deck::Presentation;
use crate::domain::dataset::Dataset;
use crate::domain::model::GenerationConfig;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 簡報檔的存取。範本只會被讀取，不會被寫入。
pub trait DeckStore: Send + Sync {
    fn open(&self, id: &str) -> impl std::future::Future<Output = Result<Presentation>> + Send;

    /// 複製範本到輸出資料夾，回傳新檔案的 ID
    fn copy_template(
        &self,
        template_id: &str,
        folder_id: &str,
        name: &str,
    ) -> impl std::future::Future<Output = Result<String>> + Send;

    fn save(&self, deck: &Presentation) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 以 ID 取得儲存空間中的二進位檔（REFERENCE_ID 圖片來源）
pub trait BlobStore: Send + Sync {
    fn fetch_blob(&self, id: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn generation_config(&self) -> Result<GenerationConfig>;
}

#[async_trait]
pub trait DatasetProvider: Send + Sync {
    async fn load_dataset(&self) -> Result<Dataset>;
}
