use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{Category, Gender, NewPet, PetStatus};
use crate::routes::required;

/// 收容所新增宠物，name / breed / image 必填
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreatePetRequest {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub image: Option<String>,
    pub age: Option<String>,
    pub gender: Option<Gender>,
    pub location: Option<String>,
    pub distance: Option<String>,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub vaccinated: Option<bool>,
    pub neutered: Option<bool>,
    pub status: Option<PetStatus>,
    pub tags: Option<Vec<String>>,
    pub gallery: Option<Vec<String>>,
    pub shelter_id: Option<String>,
}

impl CreatePetRequest {
    pub fn into_new_pet(self) -> Result<NewPet, AppError> {
        let (Some(name), Some(breed), Some(image)) = (
            required(self.name),
            required(self.breed),
            required(self.image),
        ) else {
            return Err(AppError::BadRequest(
                "Missing required fields: name, breed, and image are required".to_string(),
            ));
        };

        Ok(NewPet {
            name,
            breed,
            image,
            age: required(self.age),
            gender: self.gender,
            location: required(self.location),
            distance: required(self.distance),
            category: self.category.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            vaccinated: self.vaccinated.unwrap_or(false),
            neutered: self.neutered.unwrap_or(false),
            status: self.status.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            gallery: self.gallery.unwrap_or_default(),
            shelter_id: required(self.shelter_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let req = CreatePetRequest {
            name: Some("旺财".into()),
            breed: Some("金毛寻回犬".into()),
            image: Some("https://example.com/a.jpg".into()),
            age: Some(String::new()),
            ..Default::default()
        };
        let pet = req.into_new_pet().unwrap();
        assert_eq!(pet.category, Category::Other);
        assert_eq!(pet.status, PetStatus::Available);
        assert_eq!(pet.age, None);
        assert!(!pet.vaccinated);
        assert!(pet.tags.is_empty());
    }

    #[test]
    fn test_missing_image_rejected() {
        let req = CreatePetRequest {
            name: Some("旺财".into()),
            breed: Some("金毛寻回犬".into()),
            image: Some("   ".into()),
            ..Default::default()
        };
        assert!(matches!(req.into_new_pet(), Err(AppError::BadRequest(_))));
    }
}
