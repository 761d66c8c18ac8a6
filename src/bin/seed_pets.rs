use adoption::client::HttpGateway;
use adoption::config::ClientConfig;
use adoption::routes::pet::CreatePetRequest;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn sample_pets() -> serde_json::Result<Vec<CreatePetRequest>> {
    serde_json::from_value(serde_json::json!([
        {
            "name": "奶茶",
            "breed": "英短蓝猫",
            "age": "1岁",
            "gender": "female",
            "location": "北京市 · 朝阳区",
            "distance": "2.1km",
            "image": "https://images.unsplash.com/photo-1514888286974-6c03e2ca1dba?q=80&w=2340&auto=format&fit=crop",
            "category": "cat",
            "description": "温柔可爱的英短蓝猫，喜欢与人亲近，适合家庭饲养。",
            "vaccinated": true,
            "neutered": true,
            "status": "available",
            "tags": ["温顺", "亲人", "爱干净"],
            "gallery": [
                "https://images.unsplash.com/photo-1543852786-1cf6624b9987?q=80&w=2340&auto=format&fit=crop",
                "https://images.unsplash.com/photo-1533738363-b7f9aef128ce?q=80&w=2487&auto=format&fit=crop"
            ]
        },
        {
            "name": "旺财",
            "breed": "金毛寻回犬",
            "age": "8个月",
            "gender": "male",
            "location": "北京市 · 海淀区",
            "distance": "3.5km",
            "image": "https://images.unsplash.com/photo-1537151608828-ea2b11777ee8?q=80&w=2400&auto=format&fit=crop",
            "category": "dog",
            "description": "活泼好动的金毛幼犬，聪明听话，是理想的家庭伴侣犬。",
            "vaccinated": true,
            "neutered": false,
            "status": "available",
            "tags": ["活泼", "聪明", "友善"],
            "gallery": [
                "https://images.unsplash.com/photo-1587300003388-59208cc962cb?q=80&w=2340&auto=format&fit=crop",
                "https://images.unsplash.com/photo-1552053831-71594a27632d?q=80&w=2338&auto=format&fit=crop"
            ]
        }
    ]))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env();
    let gateway = HttpGateway::new(config.api_base_url.as_str());

    let pets = match sample_pets() {
        Ok(pets) => pets,
        Err(e) => {
            tracing::error!("Invalid sample pet data: {}", e);
            return;
        }
    };

    // 单只失败不影响后续
    for req in pets {
        let name = req.name.clone().unwrap_or_default();
        tracing::info!("正在添加宠物: {}", name);
        match gateway.create_pet(&req).await {
            Ok(pet) => tracing::info!("成功添加宠物: {} (ID: {})", pet.name, pet.id),
            Err(e) => tracing::error!("添加宠物 {} 时出错: {}", name, e),
        }
    }
    tracing::info!("所有宠物已尝试添加完毕");
}
