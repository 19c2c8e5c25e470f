//! Bean types shared by the integration tests and benchmarks.

#![allow(dead_code)]

use beanxml::collection::MetaType;
use beanxml::{
    Bean, BeanBox, BeanBuilder, BeanXmlOptions, Collection, DefaultConverter, Error, GenericType,
    MapBean, MetaBean, MetaProperty, PropertyStyle, Result, Value,
};
use indexmap::IndexMap;
use std::sync::{Arc, OnceLock};

fn bean_of(value: Value) -> Result<BeanBox> {
    match value {
        Value::Bean(bean) => Ok(bean),
        other => Err(Error::custom(format!("expected bean, found {}", other.type_name()))),
    }
}

fn collection_of(value: Value) -> Result<Collection> {
    Collection::try_from(value)
}

fn bean_value(bean: &Option<BeanBox>) -> Value {
    bean.clone().map_or(Value::Null, Value::Bean)
}

fn collection_value(collection: &Option<Collection>) -> Value {
    collection.clone().map_or(Value::Null, Value::Collection)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Address {
    pub number: i32,
    pub street: Option<String>,
    pub city: Value,
    pub owner: Option<BeanBox>,
}

impl Address {
    pub const NAME: &'static str = "app::gen::Address";

    pub fn meta() -> Arc<MetaBean> {
        static META: OnceLock<Arc<MetaBean>> = OnceLock::new();
        META.get_or_init(|| {
            Arc::new(
                MetaBean::new(Self::NAME, address_properties(), |_| Box::new(Address::default()))
                    .unwrap(),
            )
        })
        .clone()
    }

    pub fn new(number: i32, street: &str) -> Self {
        Address {
            number,
            street: Some(street.to_string()),
            ..Default::default()
        }
    }
}

fn address_properties() -> Vec<MetaProperty> {
    vec![
        MetaProperty::new("number", GenericType::INT),
        MetaProperty::new("street", GenericType::STRING),
        MetaProperty::new("city", GenericType::ANY),
        MetaProperty::new("owner", GenericType::bean(Person::NAME)),
    ]
}

impl Bean for Address {
    fn meta_bean(&self) -> Arc<MetaBean> {
        Address::meta()
    }

    fn property_value(&self, name: &str) -> Option<Value> {
        match name {
            "number" => Some(Value::Int(self.number)),
            "street" => Some(self.street.clone().into()),
            "city" => Some(self.city.clone()),
            "owner" => Some(bean_value(&self.owner)),
            _ => None,
        }
    }
}

impl BeanBuilder for Address {
    fn set(&mut self, property: &MetaProperty, value: Value) -> Result<()> {
        match property.name() {
            "number" => self.number = i32::try_from(value)?,
            "street" => self.street = Some(String::try_from(value)?),
            "city" => self.city = value,
            "owner" => self.owner = Some(bean_of(value)?),
            name => return Err(Error::unknown_property(Self::NAME, name)),
        }
        Ok(())
    }

    fn build(self: Box<Self>) -> Result<BeanBox> {
        Ok(BeanBox::new(*self))
    }
}

/// An address subtype, used where an `Address` is declared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompanyAddress {
    pub address: Address,
    pub company_name: Option<String>,
}

impl CompanyAddress {
    pub const NAME: &'static str = "app::gen::CompanyAddress";

    pub fn meta() -> Arc<MetaBean> {
        static META: OnceLock<Arc<MetaBean>> = OnceLock::new();
        META.get_or_init(|| {
            let mut properties = address_properties();
            properties.push(MetaProperty::new("companyName", GenericType::STRING));
            Arc::new(
                MetaBean::new(Self::NAME, properties, |_| Box::new(CompanyAddress::default()))
                    .unwrap(),
            )
        })
        .clone()
    }

    pub fn new(number: i32, street: &str, company_name: &str) -> Self {
        CompanyAddress {
            address: Address::new(number, street),
            company_name: Some(company_name.to_string()),
        }
    }
}

impl Bean for CompanyAddress {
    fn meta_bean(&self) -> Arc<MetaBean> {
        CompanyAddress::meta()
    }

    fn property_value(&self, name: &str) -> Option<Value> {
        match name {
            "companyName" => Some(self.company_name.clone().into()),
            other => self.address.property_value(other),
        }
    }
}

impl BeanBuilder for CompanyAddress {
    fn set(&mut self, property: &MetaProperty, value: Value) -> Result<()> {
        match property.name() {
            "companyName" => self.company_name = Some(String::try_from(value)?),
            _ => self.address.set(property, value)?,
        }
        Ok(())
    }

    fn build(self: Box<Self>) -> Result<BeanBox> {
        Ok(BeanBox::new(*self))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Person {
    pub forename: Option<String>,
    pub surname: Option<String>,
    pub number_of_cars: i32,
    pub main_address: Option<BeanBox>,
    pub other_address_map: Option<Collection>,
    pub address_list: Option<Collection>,
    pub addresses_list: Option<Collection>,
    pub code_counts: Option<Collection>,
    pub extensions: Option<MapBean>,
    pub password: Option<String>,
}

impl Person {
    pub const NAME: &'static str = "app::gen::Person";

    pub fn meta() -> Arc<MetaBean> {
        static META: OnceLock<Arc<MetaBean>> = OnceLock::new();
        META.get_or_init(|| {
            let address = GenericType::bean(Address::NAME);
            Arc::new(
                MetaBean::new(
                    Self::NAME,
                    [
                        MetaProperty::new("forename", GenericType::STRING),
                        MetaProperty::new("surname", GenericType::STRING),
                        MetaProperty::new("numberOfCars", GenericType::INT),
                        MetaProperty::new("mainAddress", address.clone()),
                        MetaProperty::new(
                            "otherAddressMap",
                            GenericType::map(GenericType::STRING, address.clone()),
                        ),
                        MetaProperty::new("addressList", GenericType::list(address.clone())),
                        MetaProperty::new(
                            "addressesList",
                            GenericType::list(GenericType::list(address)),
                        ),
                        MetaProperty::new("codeCounts", GenericType::multiset(GenericType::STRING)),
                        MetaProperty::new("extensions", GenericType::bean(MapBean::META_NAME)),
                        MetaProperty::new("fullName", GenericType::STRING)
                            .with_style(PropertyStyle::Derived),
                        MetaProperty::new("password", GenericType::STRING)
                            .with_style(PropertyStyle::WriteOnly),
                    ],
                    |_| Box::new(Person::default()),
                )
                .unwrap(),
            )
        })
        .clone()
    }

    pub fn named(forename: &str, surname: &str) -> Self {
        Person {
            forename: Some(forename.to_string()),
            surname: Some(surname.to_string()),
            ..Default::default()
        }
    }

    pub fn full_name(&self) -> Option<String> {
        match (&self.forename, &self.surname) {
            (Some(forename), Some(surname)) => Some(format!("{} {}", forename, surname)),
            _ => None,
        }
    }
}

impl Bean for Person {
    fn meta_bean(&self) -> Arc<MetaBean> {
        Person::meta()
    }

    fn property_value(&self, name: &str) -> Option<Value> {
        match name {
            "forename" => Some(self.forename.clone().into()),
            "surname" => Some(self.surname.clone().into()),
            "numberOfCars" => Some(Value::Int(self.number_of_cars)),
            "mainAddress" => Some(bean_value(&self.main_address)),
            "otherAddressMap" => Some(collection_value(&self.other_address_map)),
            "addressList" => Some(collection_value(&self.address_list)),
            "addressesList" => Some(collection_value(&self.addresses_list)),
            "codeCounts" => Some(collection_value(&self.code_counts)),
            "extensions" => Some(self.extensions.clone().map_or(Value::Null, Value::from)),
            "fullName" => Some(self.full_name().into()),
            _ => None,
        }
    }
}

impl BeanBuilder for Person {
    fn set(&mut self, property: &MetaProperty, value: Value) -> Result<()> {
        match property.name() {
            "forename" => self.forename = Some(String::try_from(value)?),
            "surname" => self.surname = Some(String::try_from(value)?),
            "numberOfCars" => self.number_of_cars = i32::try_from(value)?,
            "mainAddress" => self.main_address = Some(bean_of(value)?),
            "otherAddressMap" => self.other_address_map = Some(collection_of(value)?),
            "addressList" => self.address_list = Some(collection_of(value)?),
            "addressesList" => self.addresses_list = Some(collection_of(value)?),
            "codeCounts" => self.code_counts = Some(collection_of(value)?),
            "extensions" => self.extensions = Some(bean_of(value)?.downcast::<MapBean>()?),
            "password" => self.password = Some(String::try_from(value)?),
            name => return Err(Error::unknown_property(Self::NAME, name)),
        }
        Ok(())
    }

    fn build(self: Box<Self>) -> Result<BeanBox> {
        Ok(BeanBox::new(*self))
    }
}

/// A bean with no properties.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImmEmpty;

impl ImmEmpty {
    pub const NAME: &'static str = "app::gen::ImmEmpty";

    pub fn meta() -> Arc<MetaBean> {
        static META: OnceLock<Arc<MetaBean>> = OnceLock::new();
        META.get_or_init(|| {
            Arc::new(MetaBean::new(Self::NAME, [], |_| Box::new(ImmEmpty)).unwrap())
        })
        .clone()
    }
}

impl Bean for ImmEmpty {
    fn meta_bean(&self) -> Arc<MetaBean> {
        ImmEmpty::meta()
    }

    fn property_value(&self, _name: &str) -> Option<Value> {
        None
    }
}

impl BeanBuilder for ImmEmpty {
    fn set(&mut self, property: &MetaProperty, _value: Value) -> Result<()> {
        Err(Error::unknown_property(Self::NAME, property.name()))
    }

    fn build(self: Box<Self>) -> Result<BeanBox> {
        Ok(BeanBox::new(*self))
    }
}

/// A bean with a registered string form: written as text, never as nested properties.
#[derive(Clone, Debug, PartialEq)]
pub struct Currency(pub String);

impl Currency {
    pub const NAME: &'static str = "app::gen::Currency";

    pub fn meta() -> Arc<MetaBean> {
        static META: OnceLock<Arc<MetaBean>> = OnceLock::new();
        META.get_or_init(|| {
            Arc::new(
                MetaBean::new(
                    Self::NAME,
                    [MetaProperty::new("code", GenericType::STRING)
                        .with_style(PropertyStyle::Immutable)],
                    |_| Box::new(Currency(String::new())),
                )
                .unwrap(),
            )
        })
        .clone()
    }

    pub fn of(code: &str) -> Self {
        Currency(code.to_string())
    }
}

impl Bean for Currency {
    fn meta_bean(&self) -> Arc<MetaBean> {
        Currency::meta()
    }

    fn property_value(&self, name: &str) -> Option<Value> {
        match name {
            "code" => Some(Value::from(self.0.as_str())),
            _ => None,
        }
    }
}

impl BeanBuilder for Currency {
    fn set(&mut self, _property: &MetaProperty, value: Value) -> Result<()> {
        self.0 = String::try_from(value)?;
        Ok(())
    }

    fn build(self: Box<Self>) -> Result<BeanBox> {
        Ok(BeanBox::new(*self))
    }
}

fn currency_to_string(bean: &dyn Bean) -> Result<String> {
    bean.property_value("code")
        .and_then(|code| code.as_str().map(str::to_string))
        .ok_or_else(|| Error::custom("currency without a code"))
}

fn currency_from_string(text: &str) -> Result<BeanBox> {
    if text.len() == 3 && text.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(BeanBox::new(Currency::of(text)))
    } else {
        Err(Error::custom(format!("invalid currency code '{}'", text)))
    }
}

/// A record bean covering every declared-type shape, stored by property name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Holder {
    pub values: IndexMap<String, Value>,
}

impl Holder {
    pub const NAME: &'static str = "app::gen::Holder";

    pub fn meta() -> Arc<MetaBean> {
        static META: OnceLock<Arc<MetaBean>> = OnceLock::new();
        META.get_or_init(|| {
            let address = GenericType::bean(Address::NAME);
            let currency = GenericType::bean(Currency::NAME);
            Arc::new(
                MetaBean::new(
                    Self::NAME,
                    [
                        MetaProperty::new("anything", GenericType::ANY),
                        MetaProperty::new("rawList", GenericType::raw_collection(MetaType::List)),
                        MetaProperty::new("typedSet", GenericType::set(GenericType::INT)),
                        MetaProperty::new(
                            "keyed",
                            GenericType::map(address.clone(), GenericType::STRING),
                        ),
                        MetaProperty::new("table", GenericType::table(GenericType::INT)),
                        MetaProperty::new("when", GenericType::DATE_TIME),
                        MetaProperty::new("big", GenericType::BIG_INT),
                        MetaProperty::new("price", currency.clone()),
                        MetaProperty::new(
                            "prices",
                            GenericType::map(currency, GenericType::DOUBLE),
                        ),
                        MetaProperty::new("places", GenericType::set(address.clone())),
                        MetaProperty::new("placeCounts", GenericType::multiset(address.clone())),
                        MetaProperty::new("letters", GenericType::array(GenericType::CHAR)),
                        MetaProperty::new("mixed", GenericType::list(GenericType::ANY)),
                        MetaProperty::new("home", address),
                        MetaProperty::new("version", GenericType::LONG)
                            .with_style(PropertyStyle::ReadOnly),
                    ],
                    |_| Box::new(Holder::default()),
                )
                .unwrap(),
            )
        })
        .clone()
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }
}

impl Bean for Holder {
    fn meta_bean(&self) -> Arc<MetaBean> {
        Holder::meta()
    }

    fn property_value(&self, name: &str) -> Option<Value> {
        Holder::meta()
            .property(name)
            .map(|_| self.values.get(name).cloned().unwrap_or(Value::Null))
    }
}

impl BeanBuilder for Holder {
    fn set(&mut self, property: &MetaProperty, value: Value) -> Result<()> {
        self.values.insert(property.name().to_string(), value);
        Ok(())
    }

    fn build(self: Box<Self>) -> Result<BeanBox> {
        Ok(BeanBox::new(*self))
    }
}

pub fn converter() -> DefaultConverter {
    DefaultConverter::new().with_bean(Currency::NAME, currency_to_string, currency_from_string)
}

/// Registers every fixture type and the currency converter.
pub fn register(options: BeanXmlOptions) -> BeanXmlOptions {
    options
        .with_converter(Arc::new(converter()))
        .with_type(Address::meta())
        .with_type(CompanyAddress::meta())
        .with_type(Person::meta())
        .with_type(ImmEmpty::meta())
        .with_type(Currency::meta())
        .with_type(Holder::meta())
}

pub fn options() -> BeanXmlOptions {
    register(BeanXmlOptions::compact())
}

pub fn pretty_options() -> BeanXmlOptions {
    register(BeanXmlOptions::pretty())
}

/// A person graph touching nested beans, subtypes and every collection shape.
pub fn sample_person() -> Person {
    let mut home = Address::new(12, "Park Lane");
    home.city = Value::from("London");
    let mut person = Person::named("Ada", "Lovelace");
    person.number_of_cars = 2;
    person.main_address = Some(BeanBox::new(CompanyAddress::new(1, "Engine Row", "Analytical")));
    person.other_address_map = Some(Collection::map_from(vec![
        (Value::from("home"), Value::bean(home.clone())),
        (
            Value::from("work"),
            Value::bean(CompanyAddress::new(3, "Mill Street", "Looms")),
        ),
    ]));
    person.address_list = Some(Collection::List(vec![
        Value::bean(Address::new(5, "High Street")),
        Value::Null,
        Value::bean(home.clone()),
    ]));
    person.addresses_list = Some(Collection::List(vec![
        Value::list(vec![Value::bean(home)]),
        Value::list(Vec::new()),
    ]));
    person.code_counts = Some(Collection::multiset_from(vec![
        (Value::from("A"), 3),
        (Value::from("B"), 1),
    ]));
    person.extensions = Some(beanxml::map_bean! {
        "note" => "first programmer",
        "rank" => 1,
    });
    person
}
